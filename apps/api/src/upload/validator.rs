//! Upload Validator — decides whether an uploaded file may enter the
//! extraction pipeline, and derives a filesystem-safe name for it.
//!
//! The allow-list check runs against the filename the client declared.
//! Sanitization is a separate step that only protects the storage path;
//! extractor dispatch later uses the sanitized name.

use crate::errors::{AppError, MissingFile};

/// Extensions accepted by `/api/extract-text`, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "doc"];

/// A file that passed validation. Carries both names: the declared one for
/// logs, the sanitized one for anything touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub original_name: String,
    pub safe_name: String,
    /// Lowercased last dot-segment of the declared name.
    pub extension: String,
}

/// Lowercased text after the last `.`, if the name has a dot at all.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Reduces a client-supplied filename to something safe to use as a path
/// component.
///
/// Non-ASCII characters are dropped, path separators become whitespace,
/// whitespace runs collapse to `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed and leading/trailing `.`/`_` are trimmed. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Validates the filename of the `resume` field once the field is known to exist.
pub fn validate_filename(filename: Option<&str>) -> Result<UploadedDocument, AppError> {
    let filename = match filename {
        Some(name) if !name.is_empty() => name,
        _ => return Err(MissingFile::NoSelectedFile.into()),
    };

    if !allowed_file(filename) {
        return Err(AppError::invalid_file_type());
    }

    Ok(UploadedDocument {
        original_name: filename.to_string(),
        safe_name: secure_filename(filename),
        extension: extension(filename).unwrap_or_default(),
    })
}
