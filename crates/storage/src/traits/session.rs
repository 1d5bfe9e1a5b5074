use async_trait::async_trait;
use chrono::NaiveDate;
use streakcert_core::{
    DailySession, QuestionHistory, SessionAnswer, SessionCompletion, UserProfile,
};

use crate::error::StorageError;

/// Daily session lifecycle operations.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Session of a user for a calendar date.
    async fn get_daily_session(
        &self,
        user_id: &str,
        session_date: NaiveDate,
    ) -> Result<Option<DailySession>, StorageError>;

    /// Create the session for its (user, date), or return the one that already exists.
    async fn create_daily_session(
        &self,
        session: &DailySession,
    ) -> Result<DailySession, StorageError>;

    /// Append an answer row and write the answerer's updated history for that
    /// question, atomically. Either both land or neither does.
    async fn record_answer(
        &self,
        answer: &SessionAnswer,
        history: &QuestionHistory,
    ) -> Result<(), StorageError>;

    /// Answers of a session in the order they were given.
    async fn get_session_answers(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionAnswer>, StorageError>;

    /// Mark a session completed and fold its counts into the owner's profile, atomically.
    ///
    /// Returns the updated profile, or `None` if the session was already
    /// completed (nothing is written in that case).
    async fn complete_session(
        &self,
        completion: &SessionCompletion,
    ) -> Result<Option<UserProfile>, StorageError>;

    /// Most recent sessions of a user, newest first.
    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DailySession>, StorageError>;
}
