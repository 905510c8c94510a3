// Prompt constants for cover letter generation.

/// System role for every cover letter call.
pub const COVER_LETTER_SYSTEM: &str = "You are a professional cover letter writer who creates \
    tailored, compelling cover letters that match a candidate's experience with job requirements.";

/// Closing instruction describing the letter we want back.
pub const COVER_LETTER_INSTRUCTION: &str = "Write a personalized cover letter that highlights the \
    relevant skills and experiences from the resume that match the job requirements. The cover \
    letter should be professional, engaging, and tailored specifically to this position.";

/// Builds the user turn. Both inputs are embedded verbatim in one pass, so
/// braces or section labels inside them are never reinterpreted.
pub fn cover_letter_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "\nGenerate a professional cover letter based on the following resume and job description:\n\
         \n\
         RESUME:\n\
         {resume_text}\n\
         \n\
         JOB DESCRIPTION:\n\
         {job_description}\n\
         \n\
         {COVER_LETTER_INSTRUCTION}\n"
    )
}
