//! Domain logic for SchemaSmith: action keys, prompt templates, output
//! sanitizing, PlantUML URL encoding and document assembly.
//!
//! Nothing in this crate performs network or database I/O.

pub mod action;
pub mod document;
pub mod docx;
pub mod error;
pub mod plantuml;
pub mod prompt;
pub mod sanitize;
pub mod types;
pub mod upload;
