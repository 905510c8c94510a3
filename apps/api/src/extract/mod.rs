//! Text extraction — turns an uploaded resume into plain text.
//!
//! Two extractors implement `TextExtractor`; `DocumentKind` picks one from the
//! sanitized filename's suffix. Extraction is synchronous and CPU-bound, so
//! callers run it on the blocking pool (see `handlers`).

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::upload::temp_file::TempArtifact;

pub mod docx;
pub mod handlers;
pub mod pdf;

pub use docx::WordExtractor;
pub use pdf::PdfExtractor;

/// Message returned when dispatch finds no extractor for a name that already
/// passed the allow-list (e.g. sanitization removed the extension).
pub const UNSUPPORTED_FORMAT: &str = "Unsupported file format";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pdf(String),

    #[error("{0}")]
    Word(String),

    #[error("Unsupported file format")]
    UnsupportedFormat,
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::UnsupportedFormat => AppError::UnsupportedFormat(UNSUPPORTED_FORMAT.to_string()),
            other => AppError::Extraction(other.to_string()),
        }
    }
}

/// "Extract plain text from a file path."
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
}

impl DocumentKind {
    /// Routes by suffix only; file content is never sniffed.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            Some(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") || lower.ends_with(".doc") {
            Some(DocumentKind::Word)
        } else {
            None
        }
    }

    pub fn extractor(self) -> &'static dyn TextExtractor {
        match self {
            DocumentKind::Pdf => &PdfExtractor,
            DocumentKind::Word => &WordExtractor,
        }
    }
}

/// Dispatches on `safe_name`, extracts from the artifact, then releases it.
///
/// The artifact is consumed: it is closed after extraction whatever the
/// outcome, and dropped (hence deleted) if anything in here unwinds.
pub fn extract_and_release(safe_name: &str, artifact: TempArtifact) -> Result<String, ExtractError> {
    match DocumentKind::from_filename(safe_name) {
        Some(kind) => {
            let extractor = kind.extractor();
            debug!(extractor = extractor.name(), file = safe_name, "Extracting text");
            release_after(extractor, artifact)
        }
        None => {
            artifact.close().ok();
            Err(ExtractError::UnsupportedFormat)
        }
    }
}

fn release_after(extractor: &dyn TextExtractor, artifact: TempArtifact) -> Result<String, ExtractError> {
    let result = extractor.extract(artifact.path());
    artifact.close().ok(); // failure already logged; never masks the extraction result
    result
}

/// Runs an extraction job on the blocking pool.
///
/// A job that panics is reported as an extraction failure; anything it owned,
/// the artifact included, has been dropped by the unwind.
pub async fn run_blocking<F>(job: F) -> Result<String, AppError>
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    let text = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::Extraction(format!("Text extraction aborted: {e}")))??;
    Ok(text)
}
