use axum::extract::{Path, Query, State};
use axum::Json;
use std::sync::Arc;

use streakcert_core::{DailySession, StreakRecord, Transaction, UserProfile};

use crate::api_error::ApiError;
use crate::query_types::ListQuery;
use crate::AppState;

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(state.profile_service.get_profile(&user_id).await?))
}

pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.profile_service.list_transactions(&user_id, query.capped_limit()).await?))
}

pub async fn get_streaks(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<StreakRecord>>, ApiError> {
    Ok(Json(state.profile_service.list_streak_records(&user_id, query.capped_limit()).await?))
}

pub async fn get_sessions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DailySession>>, ApiError> {
    Ok(Json(state.profile_service.recent_sessions(&user_id, query.capped_limit()).await?))
}
