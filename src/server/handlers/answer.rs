use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::core::errors::ApiError;
use crate::pipeline::AnswerPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub text: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerPayload>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let text = payload.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }
    let limit = state.settings.retrieval.effective_limit(payload.limit);

    let span = tracing::info_span!("answer", request_id = %Uuid::new_v4(), limit);
    let result = state.pipeline.answer(text, limit).instrument(span).await;

    match result {
        Ok(answer) => Ok(Json(answer)),
        Err(err) => {
            tracing::error!("Answer request failed: {}", err);
            Err(err)
        }
    }
}
