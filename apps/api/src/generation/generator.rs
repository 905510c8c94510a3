//! Cover Letter Generation — validate input, build the prompt, make one call.
//!
//! Flow: CoverLetterRequest → validate → cover_letter_prompt → CompletionService.
//! Validation happens before anything leaves the process; a rejected request
//! never reaches the completion service.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{cover_letter_prompt, COVER_LETTER_SYSTEM};
use crate::llm_client::{CompletionRequest, CompletionService};

/// Upper bound on generated tokens per letter.
pub const MAX_TOKENS: u32 = 1000;
/// Moderate sampling randomness.
pub const TEMPERATURE: f32 = 0.7;

pub const MISSING_FIELDS_MESSAGE: &str = "Resume text and job description are required";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for `/api/generate-cover-letter`.
///
/// Fields are optional at the schema level so that a missing field and an
/// empty one produce the same validation error. Unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CoverLetterRequest {
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

/// A request whose fields are known to be present and non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest<'a> {
    pub resume_text: &'a str,
    pub job_description: &'a str,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<GenerationRequest<'_>, AppError> {
        match (non_empty(&self.resume_text), non_empty(&self.job_description)) {
            (Some(resume_text), Some(job_description)) => Ok(GenerationRequest {
                resume_text,
                job_description,
            }),
            _ => Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

impl GenerationRequest<'_> {
    pub fn completion_request(&self) -> CompletionRequest {
        CompletionRequest {
            system: COVER_LETTER_SYSTEM.to_string(),
            prompt: cover_letter_prompt(self.resume_text, self.job_description),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

/// Validates `request` and returns the first completion's text verbatim.
pub async fn generate_cover_letter(
    request: &CoverLetterRequest,
    llm: &dyn CompletionService,
) -> Result<String, AppError> {
    let validated = request.validate()?;

    info!(
        resume_chars = validated.resume_text.chars().count(),
        job_description_chars = validated.job_description.chars().count(),
        "Generating cover letter"
    );

    llm.complete(&validated.completion_request())
        .await
        .map_err(|e| AppError::GenerationService(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
