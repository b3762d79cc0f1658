use std::env;

pub const DEFAULT_MODEL: &str = "gemma-3-27b-it";
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: Option<String>,
}

impl AiConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("GOOGLE_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        Some(Self {
            api_key,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_url: env::var("GEMINI_API_URL").ok(),
        })
    }
}
