use std::fmt;

use serde::{Deserialize, Serialize};

use super::TriageError;

/// One of the three canonical output sections, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Medicines,
    Precautions,
    Locations,
}

impl Section {
    /// Fixed rendering order: medicines → precautions → locations.
    pub const ALL: [Section; 3] = [Section::Medicines, Section::Precautions, Section::Locations];

    /// Header string the backends are asked to emit.
    pub fn header(self) -> &'static str {
        match self {
            Self::Medicines => "POSSIBLE MEDICINES:",
            Self::Precautions => "PRECAUTIONS:",
            Self::Locations => "WHERE TO FIND:",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Medicines => "🏥",
            Self::Precautions => "⚠️",
            Self::Locations => "🔍",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Medicines => write!(f, "medicines"),
            Self::Precautions => write!(f, "precautions"),
            Self::Locations => write!(f, "locations"),
        }
    }
}

/// Caller-supplied position, used only to build the map-search link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Which generation backend produced (or failed to produce) a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted Gemini model (requires an API key).
    Cloud,
    /// Ollama model server on the local machine.
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cloud => write!(f, "cloud"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Outcome of a single backend invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub backend: BackendKind,
    pub outcome: Result<String, TriageError>,
}

impl GenerationResult {
    pub fn success(backend: BackendKind, text: impl Into<String>) -> Self {
        Self {
            backend,
            outcome: Ok(text.into()),
        }
    }

    pub fn failure(backend: BackendKind, reason: TriageError) -> Self {
        Self {
            backend,
            outcome: Err(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Raw backend text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn failure_reason(&self) -> Option<&TriageError> {
        self.outcome.as_ref().err()
    }
}

/// Which tier of the chain produced the advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tier", content = "backend")]
pub enum AdviceSource {
    Backend(BackendKind),
    Fallback,
}

/// Normalized triage result. All three sections are always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAdvice {
    pub medicines: Vec<String>,
    pub precautions: Vec<String>,
    pub locations: Vec<String>,
    pub map_link: String,
    /// Advisory shown above the sections (deterministic fallback only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub source: AdviceSource,
}

impl StructuredAdvice {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Medicines => &self.medicines,
            Section::Precautions => &self.precautions,
            Section::Locations => &self.locations,
        }
    }
}

/// Answer of the vagueness classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarifyDecision {
    /// Ask the user for duration, severity and pattern before querying a backend.
    NeedsMoreInfo,
    Proceed,
}

/// A text-generation backend (allows mocking).
///
/// Implementations never panic and never return early with an error: every
/// failure is folded into the returned `GenerationResult`.
pub trait GenerationBackend {
    fn kind(&self) -> BackendKind;

    fn generate(&self, text: &str, detailed_form: bool) -> GenerationResult;
}
