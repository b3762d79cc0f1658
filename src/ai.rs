pub mod config;
pub mod gemini;
pub mod prompts;
