use async_trait::async_trait;
use streakcert_core::QuestionHistory;

use crate::error::StorageError;

/// Per-(user, question) mastery history. Rows are never deleted.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Every history row of a user, across all certifications.
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<QuestionHistory>, StorageError>;

    /// History of one (user, question) pair.
    async fn get_history(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> Result<Option<QuestionHistory>, StorageError>;

    /// Insert or overwrite the row keyed by (user, question).
    async fn upsert_history(&self, history: &QuestionHistory) -> Result<(), StorageError>;
}
