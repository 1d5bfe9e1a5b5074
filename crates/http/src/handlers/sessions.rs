use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use streakcert_service::{Advance, AnswerOutcome, CompletionSummary};

use crate::api_error::ApiError;
use crate::query_types::{AnswerRequest, StartSessionRequest, UserRequest};
use crate::response_types::SessionView;
use crate::AppState;

/// Start or resume today's session.
pub async fn start_today(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let start =
        state.session_service.initialize(&req.user_id, req.certification_id.as_deref()).await?;
    Ok(Json(SessionView::from(start)))
}

/// Current state of today's in-progress session without creating one.
pub async fn get_today(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let practice = state.session_service.resume(&query.user_id).await?;
    Ok(Json(SessionView::from(&practice)))
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    let mut practice = state.session_service.resume(&req.user_id).await?;
    let outcome = state
        .session_service
        .answer(&mut practice, req.index, req.choice, req.time_spent_seconds)
        .await?;
    Ok(Json(outcome))
}

pub async fn advance(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<Json<Advance>, ApiError> {
    let mut practice = state.session_service.resume(&req.user_id).await?;
    Ok(Json(state.session_service.advance(&mut practice).await?))
}

pub async fn complete(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UserRequest>,
) -> Result<Json<CompletionSummary>, ApiError> {
    Ok(Json(state.session_service.complete_today(&req.user_id).await?))
}
