//! PlantUML server URL encoding.
//!
//! The PlantUML server accepts diagram source as raw DEFLATE data encoded
//! with its own base64 alphabet (`0-9A-Za-z-_`), appended to
//! `{server}/{format}/`.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Public PlantUML server used when none is configured.
pub const DEFAULT_PLANTUML_SERVER: &str = "https://www.plantuml.com/plantuml";

/// PlantUML's 64-character encoding alphabet.
pub const PLANTUML_ALPHABET: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-_";

/// Image format requested from the rendering server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramFormat {
    #[default]
    Png,
    Svg,
}

impl DiagramFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramFormat::Png => "png",
            DiagramFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(DiagramFormat::Png),
            "svg" => Ok(DiagramFormat::Svg),
            other => Err(CoreError::Validation(format!(
                "Unsupported diagram format '{other}'. Must be one of: png, svg"
            ))),
        }
    }
}

/// Encode bytes with the PlantUML alphabet, 3 bytes to 4 characters.
///
/// A trailing partial group is zero-padded, so the output length is always a
/// multiple of 4.
pub fn encode64(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b1 = chunk[0];
        let b2 = chunk.get(1).copied().unwrap_or(0);
        let b3 = chunk.get(2).copied().unwrap_or(0);

        let sextets = [
            b1 >> 2,
            ((b1 & 0x3) << 4) | (b2 >> 4),
            ((b2 & 0xF) << 2) | (b3 >> 6),
            b3 & 0x3F,
        ];
        for s in sextets {
            out.push(PLANTUML_ALPHABET[(s & 0x3F) as usize] as char);
        }
    }
    out
}

/// Compress with raw DEFLATE (no zlib header or checksum trailer).
fn deflate_raw(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .expect("writing to a Vec cannot fail");
    encoder.finish().expect("writing to a Vec cannot fail")
}

/// Encode diagram source into the URL payload understood by the server.
pub fn encode_source(source: &str) -> String {
    encode64(&deflate_raw(source.as_bytes()))
}

/// Build a renderable image URL for `source`.
pub fn image_url(server: &str, format: DiagramFormat, source: &str) -> String {
    format!(
        "{}/{}/{}",
        server.trim_end_matches('/'),
        format,
        encode_source(source)
    )
}
