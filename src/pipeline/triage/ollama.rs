use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::build_triage_prompt;
use super::types::{BackendKind, GenerationBackend, GenerationResult};
use super::TriageError;
use crate::config::{TriageConfig, GENERATE_TIMEOUT_SECS, PROBE_TIMEOUT_SECS};

/// Sampling parameters for triage generation.
pub const TRIAGE_TEMPERATURE: f32 = 0.3;
pub const TRIAGE_TOP_P: f32 = 0.9;
pub const TRIAGE_MAX_TOKENS: i32 = 1000;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaBackend {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    probe_timeout: Duration,
    generate_timeout: Duration,
}

impl OllamaBackend {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, model: &str) -> Result<Self, TriageError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| TriageError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            probe_timeout: Duration::from_secs(PROBE_TIMEOUT_SECS),
            generate_timeout: Duration::from_secs(GENERATE_TIMEOUT_SECS),
        })
    }

    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        Self::new(&config.ollama_base_url, &config.ollama_model)
    }

    /// Override the liveness and generation timeouts.
    pub fn with_timeouts(mut self, probe: Duration, generate: Duration) -> Self {
        self.probe_timeout = probe;
        self.generate_timeout = generate;
        self
    }

    /// Liveness probe: GET `/api/tags`. Any failure means the server is unusable.
    pub fn probe(&self) -> Result<(), TriageError> {
        let url = format!("{}/api/tags", self.base_url);
        let result = self.client.get(&url).timeout(self.probe_timeout).send();

        match result {
            Ok(response) if response.status().is_success() => Ok(()),
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), "Ollama liveness probe rejected");
                Err(TriageError::Unreachable(self.base_url.clone()))
            }
            Err(e) => {
                tracing::debug!(error = %e, "Ollama liveness probe failed");
                Err(TriageError::Unreachable(self.base_url.clone()))
            }
        }
    }

    fn call_generate(&self, prompt: &str) -> Result<String, TriageError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            temperature: TRIAGE_TEMPERATURE,
            top_p: TRIAGE_TOP_P,
            max_tokens: TRIAGE_MAX_TOKENS,
            options: OllamaOptions {
                temperature: TRIAGE_TEMPERATURE,
                top_p: TRIAGE_TOP_P,
                num_predict: TRIAGE_MAX_TOKENS,
            },
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.generate_timeout)
            .json(&body)
            .send()
            .map_err(|e| {
                TriageError::from_transport(&e, &self.base_url, self.generate_timeout.as_secs())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().map_err(|e| {
            TriageError::from_transport(&e, &self.base_url, self.generate_timeout.as_secs())
        })?;
        let parsed: OllamaGenerateResponse = serde_json::from_str(&raw)
            .map_err(|e| TriageError::MalformedPayload(e.to_string()))?;

        let text = parsed
            .response
            .ok_or_else(|| TriageError::MalformedPayload("Missing \"response\" field".into()))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(TriageError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Request body for Ollama /api/generate.
///
/// Sampling values are sent both top-level and under `options`, which is
/// where Ollama reads them.
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    temperature: f32,
    top_p: f32,
    max_tokens: i32,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    top_p: f32,
    num_predict: i32,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: Option<String>,
}

impl GenerationBackend for OllamaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn generate(&self, text: &str, detailed_form: bool) -> GenerationResult {
        if let Err(e) = self.probe() {
            return GenerationResult::failure(BackendKind::Local, e);
        }

        let prompt = build_triage_prompt(text, detailed_form);
        tracing::debug!(model = %self.model, detailed_form, "Sending request to Ollama");

        match self.call_generate(&prompt) {
            Ok(response) => {
                tracing::debug!(chars = response.len(), "Ollama response received");
                GenerationResult::success(BackendKind::Local, response)
            }
            Err(e) => GenerationResult::failure(BackendKind::Local, e),
        }
    }
}
