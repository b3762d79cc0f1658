use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use super::config::{AiConfig, GEMINI_API_URL};

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Thin client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: Option<&str>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url
                .unwrap_or(GEMINI_API_URL)
                .trim_end_matches('/')
                .to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(&config.api_key, &config.model, config.api_url.as_deref())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        let model = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/{model}:generateContent", self.base_url)
    }

    /// Send one prompt and return the text of the first candidate.
    #[instrument(level = "trace", skip(self, prompt), fields(model = %self.model))]
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        debug!(url = %url, prompt_len = prompt.len(), "sending generateContent request");

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("request to Gemini API failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err_text = resp.text().await.unwrap_or_default();
            warn!(%status, "Gemini API error");
            return Err(anyhow!("Gemini API error {status}: {err_text}"));
        }

        let raw = resp.text().await?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "generateContent response body");
        trace!(raw = %raw, "generateContent response");
        parse_generated_text(&raw)
    }
}

/// Concatenate the text parts of the first candidate.
pub fn parse_generated_text(raw: &str) -> Result<String> {
    let resp: GenerateContentResponse =
        serde_json::from_str(raw).context("invalid response JSON from Gemini API")?;

    let Some(candidate) = resp.candidates.into_iter().next() else {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(anyhow!("prompt blocked by Gemini API: {reason}"));
        }
        return Err(anyhow!("missing candidate in Gemini response"));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(anyhow!("Gemini response contained no text"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_adds_models_prefix() {
        let client = GeminiClient::new("k", "gemma-3-27b-it", Some("http://localhost/v1beta/"));
        assert_eq!(
            client.endpoint(),
            "http://localhost/v1beta/models/gemma-3-27b-it:generateContent"
        );
    }

    #[test]
    fn endpoint_keeps_existing_prefix() {
        let client = GeminiClient::new("k", "models/gemini-2.0-flash", None);
        assert_eq!(
            client.endpoint(),
            format!("{GEMINI_API_URL}/models/gemini-2.0-flash:generateContent")
        );
    }

    #[test]
    fn parse_joins_text_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hola "},{"text":"Ana"}]}}]}"#;
        assert_eq!(parse_generated_text(raw).unwrap(), "Hola Ana");
    }

    #[test]
    fn parse_reports_block_reason() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = parse_generated_text(raw).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn parse_rejects_empty_candidate() {
        let raw = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        assert!(parse_generated_text(raw).is_err());
    }
}
