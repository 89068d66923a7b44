//! Upload constants, validation and text extraction for documents sent to
//! the completion flow.

use crate::docx;
use crate::error::CoreError;

/// Default maximum accepted upload size (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Extensions accepted for upload (lowercase, without dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["docx", "txt"];

/// Kind of uploaded document, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Docx,
    Text,
}

impl UploadKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            UploadKind::Docx => docx::DOCX_MIME_TYPE,
            UploadKind::Text => "text/plain",
        }
    }
}

/// Lowercased extension of `file_name`, if any.
fn extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Validate the upload's extension and return its kind.
pub fn classify_upload(file_name: &str) -> Result<UploadKind, CoreError> {
    match extension(file_name).as_deref() {
        Some("docx") => Ok(UploadKind::Docx),
        Some("txt") => Ok(UploadKind::Text),
        _ => Err(CoreError::Validation(format!(
            "Unsupported file type for '{file_name}'. Supported: .docx, .txt"
        ))),
    }
}

/// Validate upload size against `limit` bytes.
pub fn validate_upload_size(len: usize, limit: usize) -> Result<(), CoreError> {
    if len > limit {
        return Err(CoreError::Validation(format!(
            "Upload exceeds maximum size of {limit} bytes (got {len})"
        )));
    }
    Ok(())
}

/// Reduce an uploaded file name to a safe basename.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are removed so the result can never be hidden or relative.
pub fn secure_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extract the trimmed plain text of an uploaded document.
pub fn extract_text(kind: UploadKind, bytes: &[u8]) -> Result<String, CoreError> {
    match kind {
        UploadKind::Text => Ok(String::from_utf8_lossy(bytes).trim().to_string()),
        UploadKind::Docx => docx::extract_text(bytes)
            .map(|t| t.trim().to_string())
            .map_err(|e| CoreError::Validation(format!("Unreadable .docx upload: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::document::Document;

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(classify_upload("brief.DOCX").unwrap(), UploadKind::Docx);
        assert_eq!(classify_upload("notes.txt").unwrap(), UploadKind::Text);
    }

    #[test]
    fn rejects_other_extensions() {
        assert_matches!(classify_upload("slides.pdf"), Err(CoreError::Validation(_)));
        assert_matches!(classify_upload("README"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).is_err());
        assert!(validate_upload_size(11, 10).is_err());
    }

    #[test]
    fn secure_name_strips_paths_and_odd_chars() {
        assert_eq!(secure_file_name("../../etc/passwd"), "passwd");
        assert_eq!(secure_file_name("C:\\Users\\me\\Proje Özeti.docx"), "Proje__zeti.docx");
        assert_eq!(secure_file_name("..."), "upload");
    }

    #[test]
    fn text_upload_is_trimmed_lossy_utf8() {
        let text = extract_text(UploadKind::Text, b"  hello\xff  \n").unwrap();
        assert_eq!(text, "hello\u{fffd}");
    }

    #[test]
    fn docx_upload_yields_paragraph_text() {
        let bytes = Document::from_text("First line\n\nSecond line").to_docx().unwrap();
        let text = extract_text(UploadKind::Docx, &bytes).unwrap();
        assert_eq!(text, "First line\nSecond line");
    }

    #[test]
    fn corrupt_docx_is_validation_error() {
        assert_matches!(
            extract_text(UploadKind::Docx, b"nope"),
            Err(CoreError::Validation(_))
        );
    }
}
