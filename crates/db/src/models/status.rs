//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

use serde::Serialize;

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Name as seeded in the lookup table.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Map a database status ID back to its variant.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Lifecycle of a generated or uploaded file.
    ///
    /// `Uploaded` is the only non-terminal state.
    FileStatus {
        Uploaded = 1 => "UPLOADED",
        Done = 2 => "DONE",
        Error = 3 => "ERROR",
    }
}

impl FileStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, FileStatus::Uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(FileStatus::Uploaded.id(), 1);
        assert_eq!(FileStatus::Done.id(), 2);
        assert_eq!(FileStatus::Error.id(), 3);
    }

    #[test]
    fn from_id_round_trips_known_ids() {
        for status in [FileStatus::Uploaded, FileStatus::Done, FileStatus::Error] {
            assert_eq!(FileStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(FileStatus::from_id(9), None);
    }

    #[test]
    fn only_uploaded_is_non_terminal() {
        assert!(!FileStatus::Uploaded.is_terminal());
        assert!(FileStatus::Done.is_terminal());
        assert_eq!(FileStatus::Error.name(), "ERROR");
    }
}
