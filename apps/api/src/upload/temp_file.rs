//! Temporary File Manager — request-owned on-disk copy of an upload.
//!
//! `TempArtifact` wraps a `tempfile::NamedTempFile`, so the file is removed
//! when the artifact is dropped: on success, on an extractor error, on an
//! early `?` return and during a panic unwind. `close` is the explicit
//! release for the happy path and reports deletion failures.

use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const ARTIFACT_PREFIX: &str = "upload-";

/// Longest part of the sanitized name carried into an artifact's file name.
/// Keeps every allowed upload name well inside the 255-byte name limit.
const MAX_NAME_DECORATION: usize = 64;

#[derive(Debug)]
pub struct TempArtifact {
    file: NamedTempFile,
    writer: Option<tokio::fs::File>,
    len: u64,
}

impl TempArtifact {
    /// Creates a uniquely named, owner-only file inside `dir`.
    /// `safe_name` must already be sanitized; it only decorates the name and
    /// is shortened (extension kept) when long.
    pub fn create_in(dir: &Path, safe_name: &str) -> io::Result<Self> {
        let decoration = name_decoration(safe_name);
        let suffix = if decoration.is_empty() {
            String::new()
        } else {
            format!("-{decoration}")
        };

        let file = tempfile::Builder::new()
            .prefix(ARTIFACT_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)?;
        let writer = tokio::fs::File::from_std(file.as_file().try_clone()?);

        debug!(path = %file.path().display(), "Created upload artifact");

        Ok(Self {
            file,
            writer: Some(writer),
            len: 0,
        })
    }

    /// Appends one chunk of the upload stream.
    pub async fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "artifact already finished"))?;
        writer.write_all(chunk).await?;
        self.len += chunk.len() as u64;
        Ok(())
    }

    /// Flushes pending writes. After this the file is complete and may be read
    /// by path.
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
            writer.sync_all().await?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    /// Deletes the file now. Failure is logged and returned; the artifact is
    /// consumed either way so the delete is never attempted twice.
    pub fn close(self) -> io::Result<()> {
        let path = self.file.path().to_path_buf();
        drop(self.writer);
        self.file.close().map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to remove upload artifact");
            e
        })
    }
}

/// Cuts `safe_name` to `MAX_NAME_DECORATION` bytes, truncating the stem and
/// keeping the extension.
fn name_decoration(safe_name: &str) -> String {
    if safe_name.len() <= MAX_NAME_DECORATION {
        return safe_name.to_string();
    }

    let (stem, extension) = match safe_name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() < MAX_NAME_DECORATION => (stem, Some(ext)),
        _ => (safe_name, None),
    };
    let budget = MAX_NAME_DECORATION - extension.map_or(0, |ext| ext.len() + 1);
    let stem = truncate_at_char_boundary(stem, budget);

    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_artifact_holds_appended_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = TempArtifact::create_in(dir.path(), "cv.pdf").unwrap();
        artifact.append(b"hello ").await.unwrap();
        artifact.append(b"world").await.unwrap();
        artifact.finish().await.unwrap();

        assert_eq!(artifact.len(), 11);
        assert_eq!(std::fs::read(artifact.path()).unwrap(), b"hello world");
        let name = artifact.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("upload-"));
        assert!(name.ends_with("-cv.pdf"));
    }

    #[tokio::test]
    async fn test_close_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut artifact = TempArtifact::create_in(dir.path(), "cv.docx").unwrap();
        artifact.append(b"data").await.unwrap();
        artifact.finish().await.unwrap();
        let path = artifact.path().to_path_buf();

        artifact.close().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file_on_error_path() {
        let dir = tempfile::tempdir().unwrap();

        async fn failing_step(dir: &Path) -> io::Result<std::path::PathBuf> {
            let mut artifact = TempArtifact::create_in(dir, "cv.pdf")?;
            artifact.append(b"partial").await?;
            let path = artifact.path().to_path_buf();
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("bad upload at {}", path.display()),
            ))
        }

        assert!(failing_step(dir.path()).await.is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_same_safe_name_gets_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempArtifact::create_in(dir.path(), "cv.pdf").unwrap();
        let b = TempArtifact::create_in(dir.path(), "cv.pdf").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_short_names_are_kept_whole() {
        assert_eq!(name_decoration("cv.pdf"), "cv.pdf");
        assert_eq!(name_decoration(""), "");
    }

    #[test]
    fn test_long_names_keep_extension() {
        let long = format!("{}.docx", "a".repeat(245));
        let decoration = name_decoration(&long);

        assert_eq!(decoration.len(), MAX_NAME_DECORATION);
        assert!(decoration.starts_with("aaaa"));
        assert!(decoration.ends_with(".docx"));
    }

    #[test]
    fn test_long_name_without_usable_extension_is_truncated() {
        let long = "b".repeat(300);
        assert_eq!(name_decoration(&long), "b".repeat(MAX_NAME_DECORATION));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        assert_eq!(truncate_at_char_boundary("aé", 2), "a");
        assert_eq!(truncate_at_char_boundary("aé", 3), "aé");
    }

    #[tokio::test]
    async fn test_long_safe_name_still_creates_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let long = format!("{}.docx", "a".repeat(250));
        let mut artifact = TempArtifact::create_in(dir.path(), &long).unwrap();
        artifact.append(b"PK").await.unwrap();
        artifact.finish().await.unwrap();

        let name = artifact.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.len() < 100, "{name}");
        assert!(name.ends_with(".docx"));
    }

    #[tokio::test]
    async fn test_empty_safe_name_has_no_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = TempArtifact::create_in(dir.path(), "").unwrap();
        let name = artifact.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.ends_with('-'));
    }
}
