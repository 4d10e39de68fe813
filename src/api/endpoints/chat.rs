//! `POST /api/chat`: symptom text in, triage advice out.
//!
//! Vague input gets a request for more detail instead of advice. Everything
//! else goes through the orchestrator on the blocking pool, since the
//! backends use blocking HTTP.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::triage::{classify, render_html, ClarifyDecision, Location, StructuredAdvice};

pub const MORE_INFO_MESSAGE: &str = "Please provide more details about your symptoms.";

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub symptoms: String,
    pub location: Option<Location>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub needs_more_info: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    /// Rendered HTML fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<StructuredAdvice>,
}

impl ChatResponse {
    fn needs_more_info() -> Self {
        Self {
            needs_more_info: true,
            message: Some(MORE_INFO_MESSAGE),
            answer: None,
            advice: None,
        }
    }

    fn answer(advice: StructuredAdvice) -> Self {
        Self {
            needs_more_info: false,
            message: None,
            answer: Some(render_html(&advice)),
            advice: Some(advice),
        }
    }
}

pub async fn send(
    State(ctx): State<ApiContext>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let symptoms = req.symptoms.trim().to_string();
    if symptoms.is_empty() {
        return Err(ApiError::NoSymptoms);
    }

    if classify(&symptoms) == ClarifyDecision::NeedsMoreInfo {
        tracing::debug!(chars = symptoms.len(), "Symptoms too vague, asking for details");
        return Ok(Json(ChatResponse::needs_more_info()));
    }

    let orchestrator = ctx.orchestrator.clone();
    let location = req.location;
    let advice = tokio::task::spawn_blocking(move || orchestrator.resolve(&symptoms, location.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("Triage task failed: {e}")))?;

    Ok(Json(ChatResponse::answer(advice)))
}
