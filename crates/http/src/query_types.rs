//! Request/query types (Deserialize)

use serde::Deserialize;
use streakcert_core::{AnswerOption, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

const fn default_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: String,
    pub certification_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub user_id: String,
    pub index: usize,
    pub choice: AnswerOption,
    #[serde(default)]
    pub time_spent_seconds: i32,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl ListQuery {
    #[must_use]
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_LIST_LIMIT)
    }
}
