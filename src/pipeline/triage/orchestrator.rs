use uuid::Uuid;

use super::classify::is_detailed_form;
use super::fallback::fallback_advice;
use super::gemini::GeminiBackend;
use super::normalize::normalize;
use super::ollama::OllamaBackend;
use super::types::{AdviceSource, BackendKind, GenerationBackend, Location, StructuredAdvice};
use super::TriageError;
use crate::config::TriageConfig;

/// Position in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Try the backend at this index.
    Attempt(usize),
    /// Every backend failed or none is configured.
    Fallback,
}

/// Resolves symptom text to advice: cloud → local → deterministic fallback.
///
/// Backends are tried strictly in order and the first usable text wins.
/// Failures are logged and swallowed, so `resolve` always produces advice.
pub struct TriageOrchestrator {
    backends: Vec<Box<dyn GenerationBackend + Send + Sync>>,
}

impl TriageOrchestrator {
    pub fn new(backends: Vec<Box<dyn GenerationBackend + Send + Sync>>) -> Self {
        Self { backends }
    }

    /// Standard chain. The cloud backend is only included when a credential
    /// is configured.
    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        let mut backends: Vec<Box<dyn GenerationBackend + Send + Sync>> = Vec::new();

        let gemini = GeminiBackend::from_config(config)?;
        if gemini.has_credential() {
            backends.push(Box::new(gemini));
        } else {
            tracing::info!("GEMINI_API_KEY not set, cloud backend disabled");
        }
        backends.push(Box::new(OllamaBackend::from_config(config)?));

        Ok(Self::new(backends))
    }

    pub fn has_cloud(&self) -> bool {
        self.backends.iter().any(|b| b.kind() == BackendKind::Cloud)
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }

    /// Produce advice for `text`. Never fails.
    pub fn resolve(&self, text: &str, location: Option<&Location>) -> StructuredAdvice {
        let request_id = Uuid::new_v4();
        let _span = tracing::info_span!("triage", request_id = %request_id).entered();

        let detailed_form = is_detailed_form(text);
        tracing::info!(
            chars = text.len(),
            detailed_form,
            backends = self.backends.len(),
            "Resolving triage request"
        );

        let mut step = self.first_step();
        loop {
            step = match step {
                Step::Attempt(index) => {
                    let backend = &self.backends[index];
                    let result = backend.generate(text, detailed_form);
                    match result.outcome {
                        Ok(raw) => {
                            tracing::info!(backend = %result.backend, "Backend produced advice");
                            return normalize(&raw, AdviceSource::Backend(result.backend), location);
                        }
                        Err(e) => {
                            tracing::warn!(backend = %result.backend, error = %e, "Backend failed, trying next tier");
                            self.next_step(index)
                        }
                    }
                }
                Step::Fallback => {
                    tracing::warn!("All backends failed, using deterministic fallback");
                    return fallback_advice(text, location);
                }
            };
        }
    }

    fn first_step(&self) -> Step {
        if self.backends.is_empty() {
            Step::Fallback
        } else {
            Step::Attempt(0)
        }
    }

    fn next_step(&self, index: usize) -> Step {
        if index + 1 < self.backends.len() {
            Step::Attempt(index + 1)
        } else {
            Step::Fallback
        }
    }
}
