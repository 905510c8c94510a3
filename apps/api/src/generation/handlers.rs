//! Axum route handler for the Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::errors::AppError;
use crate::generation::generator::{generate_cover_letter, CoverLetterRequest, CoverLetterResponse};
use crate::state::AppState;

/// POST /api/generate-cover-letter
///
/// Body: `{"resumeText": "...", "jobDescription": "..."}`.
/// Returns `{"coverLetter": "..."}` with the generated text unmodified.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    payload: Result<Json<CoverLetterRequest>, JsonRejection>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let Json(request) = payload?;

    let cover_letter = generate_cover_letter(&request, state.llm.as_ref()).await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}
