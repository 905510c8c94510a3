//! Axum route handler for resume text extraction.

use anyhow::Context;
use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{AppError, MissingFile};
use crate::extract::{extract_and_release, run_blocking};
use crate::state::AppState;
use crate::upload::temp_file::TempArtifact;
use crate::upload::validator::validate_filename;

/// Multipart field carrying the resume file.
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// POST /api/extract-text
///
/// Validates the `resume` upload, spools it to a temporary file, extracts the
/// text on the blocking pool and returns it. The temporary file never
/// outlives the request.
pub async fn handle_extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    // Not a multipart body at all: there is no file part to find.
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Upload request is not multipart");
        MissingFile::NoFilePart
    })?;

    // A `resume` part without a filename is a plain form value, not a file.
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(RESUME_FIELD) && field.file_name().is_some() {
            return extract_upload(&state, field).await;
        }
    }

    Err(MissingFile::NoFilePart.into())
}

async fn extract_upload(
    state: &AppState,
    mut field: Field<'_>,
) -> Result<Json<ExtractTextResponse>, AppError> {
    let document = validate_filename(field.file_name())?;

    let mut artifact = TempArtifact::create_in(&state.config.upload_dir, &document.safe_name)
        .context("Failed to create upload artifact")?;
    while let Some(chunk) = field.chunk().await? {
        artifact
            .append(&chunk)
            .await
            .context("Failed to write upload artifact")?;
    }
    artifact
        .finish()
        .await
        .context("Failed to flush upload artifact")?;

    info!(
        filename = %document.original_name,
        extension = %document.extension,
        bytes = artifact.len(),
        "Resume upload received"
    );

    let safe_name = document.safe_name.clone();
    let text = run_blocking(move || extract_and_release(&safe_name, artifact)).await?;

    info!(
        filename = %document.original_name,
        chars = text.chars().count(),
        "Resume text extracted"
    );

    Ok(Json(ExtractTextResponse { text }))
}
