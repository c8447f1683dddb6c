//! Google Gemini text generator over blocking HTTP.

use super::llm::TextGenerator;
use super::PolicyError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

pub struct GeminiGenerator {
    agent: ureq::Agent,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Reads the key from `GOOGLE_API_KEY` and uses the default model.
    pub fn from_env() -> Result<Self, PolicyError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(PolicyError::MissingApiKey(API_KEY_VAR))?;
        Ok(Self::new(api_key, DEFAULT_MODEL))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(system_prompt: &str, user_prompt: &str) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": user_prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" },
        })
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&mut self, system_prompt: &str, user_prompt: &str) -> Result<String, PolicyError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);

        let response: GenerateResponse = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.api_key)
            .send_json(Self::request_body(system_prompt, user_prompt))
            .map_err(|e| PolicyError::Transport(e.to_string()))?
            .into_json()
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        extract_text(response)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, PolicyError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|content| content.parts.into_iter().next())
        .map(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(PolicyError::EmptyResponse)
}
