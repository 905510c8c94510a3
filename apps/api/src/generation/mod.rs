// Cover letter generation: request validation, prompt assembly and the single
// call out to the completion service.

pub mod generator;
pub mod handlers;
pub mod prompts;
