//! Shared types for the HTTP layer.

use std::sync::Arc;

use crate::pipeline::triage::TriageOrchestrator;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub orchestrator: Arc<TriageOrchestrator>,
}

impl ApiContext {
    pub fn new(orchestrator: Arc<TriageOrchestrator>) -> Self {
        Self { orchestrator }
    }
}
