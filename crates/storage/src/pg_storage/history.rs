//! HistoryStore implementation for PgStorage.

use super::*;

use crate::traits::HistoryStore;
use async_trait::async_trait;

#[async_trait]
impl HistoryStore for PgStorage {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<QuestionHistory>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {HISTORY_COLUMNS} FROM user_question_history WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_history).collect()
    }

    async fn get_history(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> Result<Option<QuestionHistory>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {HISTORY_COLUMNS} FROM user_question_history
             WHERE user_id = $1 AND question_id = $2"
        ))
        .bind(user_id)
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_history(&r)).transpose()
    }

    async fn upsert_history(&self, history: &QuestionHistory) -> Result<(), StorageError> {
        write_history(&self.pool, history).await
    }
}

/// Upsert keyed by (user, question); shared with the answer transaction.
pub(super) async fn write_history<'e>(
    executor: impl sqlx::PgExecutor<'e>,
    history: &QuestionHistory,
) -> Result<(), StorageError> {
    sqlx::query(&format!(
        "INSERT INTO user_question_history ({HISTORY_COLUMNS})
         VALUES ($1,$2,$3,$4,$5,$6)
         ON CONFLICT (user_id, question_id) DO UPDATE SET
           times_seen = EXCLUDED.times_seen,
           times_correct = EXCLUDED.times_correct,
           mastery_level = EXCLUDED.mastery_level,
           last_seen_at = EXCLUDED.last_seen_at"
    ))
    .bind(&history.user_id)
    .bind(&history.question_id)
    .bind(history.times_seen)
    .bind(history.times_correct)
    .bind(history.mastery_level)
    .bind(history.last_seen_at)
    .execute(executor)
    .await?;
    Ok(())
}
