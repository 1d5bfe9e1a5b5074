//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use chrono::NaiveDate;
use streakcert_core::{
    Certification, DailySession, Question, QuestionHistory, SessionAnswer, SessionCompletion,
    StreakRecord, Transaction, UserProfile,
};

use crate::error::StorageError;
use crate::memory::MemoryStorage;
use crate::traits::{HistoryStore, LedgerStore, ProfileStore, QuestionStore, SessionStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Memory(s) => <MemoryStorage as $trait>::$method(s, $($arg),*).await,
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres(s) => <crate::pg_storage::PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgStorage),
}

impl StorageBackend {
    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    #[cfg(feature = "postgres")]
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

// ── QuestionStore ────────────────────────────────────────────────

#[async_trait]
impl QuestionStore for StorageBackend {
    async fn get_certification(&self, id: &str) -> Result<Option<Certification>, StorageError> {
        dispatch!(self, QuestionStore, get_certification(id))
    }

    async fn save_certification(&self, certification: &Certification) -> Result<(), StorageError> {
        dispatch!(self, QuestionStore, save_certification(certification))
    }

    async fn save_question(&self, question: &Question) -> Result<(), StorageError> {
        dispatch!(self, QuestionStore, save_question(question))
    }

    async fn fetch_approved_questions(
        &self,
        certification_id: &str,
    ) -> Result<Vec<Question>, StorageError> {
        dispatch!(self, QuestionStore, fetch_approved_questions(certification_id))
    }

    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, StorageError> {
        dispatch!(self, QuestionStore, get_questions_by_ids(ids))
    }

    async fn increment_question_stats(
        &self,
        question_id: &str,
        correct: bool,
    ) -> Result<(), StorageError> {
        dispatch!(self, QuestionStore, increment_question_stats(question_id, correct))
    }
}

// ── HistoryStore ─────────────────────────────────────────────────

#[async_trait]
impl HistoryStore for StorageBackend {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<QuestionHistory>, StorageError> {
        dispatch!(self, HistoryStore, fetch_history(user_id))
    }

    async fn get_history(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> Result<Option<QuestionHistory>, StorageError> {
        dispatch!(self, HistoryStore, get_history(user_id, question_id))
    }

    async fn upsert_history(&self, history: &QuestionHistory) -> Result<(), StorageError> {
        dispatch!(self, HistoryStore, upsert_history(history))
    }
}

// ── SessionStore ─────────────────────────────────────────────────

#[async_trait]
impl SessionStore for StorageBackend {
    async fn get_daily_session(
        &self,
        user_id: &str,
        session_date: NaiveDate,
    ) -> Result<Option<DailySession>, StorageError> {
        dispatch!(self, SessionStore, get_daily_session(user_id, session_date))
    }

    async fn create_daily_session(
        &self,
        session: &DailySession,
    ) -> Result<DailySession, StorageError> {
        dispatch!(self, SessionStore, create_daily_session(session))
    }

    async fn record_answer(
        &self,
        answer: &SessionAnswer,
        history: &QuestionHistory,
    ) -> Result<(), StorageError> {
        dispatch!(self, SessionStore, record_answer(answer, history))
    }

    async fn get_session_answers(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionAnswer>, StorageError> {
        dispatch!(self, SessionStore, get_session_answers(session_id))
    }

    async fn complete_session(
        &self,
        completion: &SessionCompletion,
    ) -> Result<Option<UserProfile>, StorageError> {
        dispatch!(self, SessionStore, complete_session(completion))
    }

    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DailySession>, StorageError> {
        dispatch!(self, SessionStore, recent_sessions(user_id, limit))
    }
}

// ── ProfileStore ─────────────────────────────────────────────────

#[async_trait]
impl ProfileStore for StorageBackend {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        dispatch!(self, ProfileStore, get_profile(user_id))
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        dispatch!(self, ProfileStore, save_profile(profile))
    }

    async fn list_active_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        dispatch!(self, ProfileStore, list_active_profiles())
    }
}

// ── LedgerStore ──────────────────────────────────────────────────

#[async_trait]
impl LedgerStore for StorageBackend {
    async fn insert_penalty_if_absent(&self, penalty: &Transaction) -> Result<bool, StorageError> {
        dispatch!(self, LedgerStore, insert_penalty_if_absent(penalty))
    }

    async fn archive_and_reset_streak(&self, record: &StreakRecord) -> Result<bool, StorageError> {
        dispatch!(self, LedgerStore, archive_and_reset_streak(record))
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, StorageError> {
        dispatch!(self, LedgerStore, list_transactions(user_id, limit))
    }

    async fn list_streak_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        dispatch!(self, LedgerStore, list_streak_records(user_id, limit))
    }
}
