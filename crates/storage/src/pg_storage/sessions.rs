//! SessionStore implementation for PgStorage.

use super::*;

use crate::traits::SessionStore;
use async_trait::async_trait;
use streakcert_core::SessionCompletion;

use super::history::write_history;

#[async_trait]
impl SessionStore for PgStorage {
    async fn get_daily_session(
        &self,
        user_id: &str,
        session_date: NaiveDate,
    ) -> Result<Option<DailySession>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM daily_sessions WHERE user_id = $1 AND session_date = $2"
        ))
        .bind(user_id)
        .bind(session_date)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_session(&r)).transpose()
    }

    async fn create_daily_session(
        &self,
        session: &DailySession,
    ) -> Result<DailySession, StorageError> {
        let question_ids = serde_json::to_value(&session.question_ids)?;
        sqlx::query(&format!(
            "INSERT INTO daily_sessions ({SESSION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
             ON CONFLICT (user_id, session_date) DO NOTHING"
        ))
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(session.session_date)
        .bind(&session.certification_id)
        .bind(question_ids)
        .bind(session.questions_answered)
        .bind(session.correct_answers)
        .bind(session.completed)
        .bind(session.completed_at)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        // Whoever won the race on (user_id, session_date) owns the day.
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM daily_sessions WHERE user_id = $1 AND session_date = $2"
        ))
        .bind(&session.user_id)
        .bind(session.session_date)
        .fetch_one(&self.pool)
        .await?;
        row_to_session(&row)
    }

    async fn record_answer(
        &self,
        answer: &SessionAnswer,
        history: &QuestionHistory,
    ) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "INSERT INTO session_answers ({ANSWER_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6,$7)"
        ))
        .bind(&answer.id)
        .bind(&answer.session_id)
        .bind(&answer.question_id)
        .bind(answer.user_answer.as_str())
        .bind(answer.correct)
        .bind(answer.time_spent_seconds)
        .bind(answer.answered_at)
        .execute(&mut *tx)
        .await?;
        write_history(&mut *tx, history).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_session_answers(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionAnswer>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {ANSWER_COLUMNS} FROM session_answers WHERE session_id = $1 ORDER BY answered_at"
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_answer).collect()
    }

    async fn complete_session(
        &self,
        completion: &SessionCompletion,
    ) -> Result<Option<UserProfile>, StorageError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE daily_sessions
                SET questions_answered = $1, correct_answers = $2,
                    completed = TRUE, completed_at = $3
              WHERE id = $4 AND completed = FALSE",
        )
        .bind(completion.questions_answered)
        .bind(completion.correct_answers)
        .bind(completion.completed_at)
        .bind(&completion.session_id)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1 FOR UPDATE"
        ))
        .bind(&completion.user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Err(StorageError::NotFound {
                entity: "user_profile",
                id: completion.user_id.clone(),
            });
        };
        let mut profile = row_to_profile(&row)?;
        profile.record_completion(
            completion.session_date,
            completion.questions_answered,
            completion.correct_answers,
            completion.completed_at,
        );

        sqlx::query(
            "UPDATE user_profiles
                SET streak_count = $1, longest_streak = $2, last_session_date = $3,
                    total_questions_answered = $4, total_correct_answers = $5, updated_at = $6
              WHERE id = $7",
        )
        .bind(profile.streak_count)
        .bind(profile.longest_streak)
        .bind(profile.last_session_date)
        .bind(profile.total_questions_answered)
        .bind(profile.total_correct_answers)
        .bind(profile.updated_at)
        .bind(&profile.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(profile))
    }

    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DailySession>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM daily_sessions
             WHERE user_id = $1 ORDER BY session_date DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_session).collect()
    }
}
