use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::build_triage_prompt;
use super::types::{BackendKind, GenerationBackend, GenerationResult};
use super::TriageError;
use crate::config::{TriageConfig, GENERATE_TIMEOUT_SECS};

/// Gemini `generateContent` client for cloud inference.
pub struct GeminiBackend {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl GeminiBackend {
    /// Create a client. A missing or blank key disables the backend without
    /// failing construction.
    pub fn new(api_key: Option<String>, base_url: &str, model: &str) -> Result<Self, TriageError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TriageError::Http(e.to_string()))?;

        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout: Duration::from_secs(GENERATE_TIMEOUT_SECS),
        })
    }

    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        Self::new(
            config.gemini_api_key.clone(),
            &config.gemini_base_url,
            &config.gemini_model,
        )
    }

    /// Override the generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn call(&self, api_key: &str, prompt: &str) -> Result<String, TriageError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        // Key travels in a header so it never appears in URLs or error messages.
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .map_err(|e| TriageError::from_transport(&e, &self.base_url, self.timeout.as_secs()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .map_err(|e| TriageError::from_transport(&e, &self.base_url, self.timeout.as_secs()))?;
        let parsed: GeminiResponse = serde_json::from_str(&raw)
            .map_err(|e| TriageError::MalformedPayload(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| TriageError::MalformedPayload("No candidate text in response".into()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TriageError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body; blocked prompts come back without candidates.
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerationBackend for GeminiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
    }

    fn generate(&self, text: &str, detailed_form: bool) -> GenerationResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return GenerationResult::failure(BackendKind::Cloud, TriageError::CredentialMissing);
        };

        let prompt = build_triage_prompt(text, detailed_form);
        tracing::debug!(model = %self.model, detailed_form, "Sending request to Gemini");

        match self.call(api_key, &prompt) {
            Ok(response) => {
                tracing::debug!(chars = response.len(), "Gemini response received");
                GenerationResult::success(BackendKind::Cloud, response)
            }
            Err(e) => GenerationResult::failure(BackendKind::Cloud, e),
        }
    }
}
