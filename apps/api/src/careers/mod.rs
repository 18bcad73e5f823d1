// Career recommendations: profile validation, prompt construction,
// the completion call and best-effort parsing of the model's answer.

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
