//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod file_record_repo;
pub mod project_output_repo;
pub mod project_repo;

pub use file_record_repo::FileRecordRepo;
pub use project_output_repo::ProjectOutputRepo;
pub use project_repo::ProjectRepo;
