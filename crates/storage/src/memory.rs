//! In-process storage backend.
//!
//! Keeps every table in a single `RwLock`-guarded state so multi-row
//! operations (session completion, streak archival) are atomic the same way
//! the PostgreSQL transactions are. Used by tests and by `STREAKCERT_BACKEND=memory`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use streakcert_core::{
    Certification, DailySession, Question, QuestionHistory, SessionAnswer, SessionCompletion,
    StreakRecord, Transaction, TransactionType, UserProfile,
};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::{HistoryStore, LedgerStore, ProfileStore, QuestionStore, SessionStore};

#[derive(Debug, Default)]
struct MemoryState {
    certifications: HashMap<String, Certification>,
    questions: Vec<Question>,
    history: HashMap<(String, String), QuestionHistory>,
    sessions: Vec<DailySession>,
    answers: Vec<SessionAnswer>,
    profiles: HashMap<String, UserProfile>,
    transactions: Vec<Transaction>,
    streak_records: Vec<StreakRecord>,
    faults: HashSet<(String, String)>,
}

impl MemoryState {
    /// Fail with a transient error if a fault was injected for `(op, key)`.
    fn check_fault(&self, op: &str, key: &str) -> Result<(), StorageError> {
        if self.faults.contains(&(op.to_owned(), key.to_owned())) {
            return Err(StorageError::Unavailable(format!("injected fault on {op}")));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make operation `op` fail for `key` until [`clear_faults`](Self::clear_faults).
    ///
    /// `op` is the trait method name; `key` is the user ID for per-user
    /// operations and the question ID for `increment_question_stats`.
    pub async fn inject_fault(&self, op: &str, key: &str) {
        self.state.write().await.faults.insert((op.to_owned(), key.to_owned()));
    }

    pub async fn clear_faults(&self) {
        self.state.write().await.faults.clear();
    }
}

#[async_trait]
impl QuestionStore for MemoryStorage {
    async fn get_certification(&self, id: &str) -> Result<Option<Certification>, StorageError> {
        Ok(self.state.read().await.certifications.get(id).cloned())
    }

    async fn save_certification(&self, certification: &Certification) -> Result<(), StorageError> {
        self.state
            .write()
            .await
            .certifications
            .insert(certification.id.clone(), certification.clone());
        Ok(())
    }

    async fn save_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        match state.questions.iter_mut().find(|q| q.id == question.id) {
            Some(existing) => *existing = question.clone(),
            None => state.questions.push(question.clone()),
        }
        Ok(())
    }

    async fn fetch_approved_questions(
        &self,
        certification_id: &str,
    ) -> Result<Vec<Question>, StorageError> {
        let state = self.state.read().await;
        state.check_fault("fetch_approved_questions", certification_id)?;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.approved && q.certification_id == certification_id)
            .cloned()
            .collect())
    }

    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, StorageError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let state = self.state.read().await;
        Ok(state.questions.iter().filter(|q| wanted.contains(q.id.as_str())).cloned().collect())
    }

    async fn increment_question_stats(
        &self,
        question_id: &str,
        correct: bool,
    ) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("increment_question_stats", question_id)?;
        let question = state.questions.iter_mut().find(|q| q.id == question_id).ok_or_else(|| {
            StorageError::NotFound { entity: "question", id: question_id.to_owned() }
        })?;
        question.times_answered = question.times_answered.saturating_add(1);
        if correct {
            question.times_correct = question.times_correct.saturating_add(1);
        }
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for MemoryStorage {
    async fn fetch_history(&self, user_id: &str) -> Result<Vec<QuestionHistory>, StorageError> {
        let state = self.state.read().await;
        state.check_fault("fetch_history", user_id)?;
        Ok(state.history.values().filter(|h| h.user_id == user_id).cloned().collect())
    }

    async fn get_history(
        &self,
        user_id: &str,
        question_id: &str,
    ) -> Result<Option<QuestionHistory>, StorageError> {
        let key = (user_id.to_owned(), question_id.to_owned());
        Ok(self.state.read().await.history.get(&key).cloned())
    }

    async fn upsert_history(&self, history: &QuestionHistory) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("upsert_history", &history.user_id)?;
        state
            .history
            .insert((history.user_id.clone(), history.question_id.clone()), history.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStorage {
    async fn get_daily_session(
        &self,
        user_id: &str,
        session_date: NaiveDate,
    ) -> Result<Option<DailySession>, StorageError> {
        let state = self.state.read().await;
        state.check_fault("get_daily_session", user_id)?;
        Ok(state
            .sessions
            .iter()
            .find(|s| s.user_id == user_id && s.session_date == session_date)
            .cloned())
    }

    async fn create_daily_session(
        &self,
        session: &DailySession,
    ) -> Result<DailySession, StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("create_daily_session", &session.user_id)?;
        if let Some(existing) = state
            .sessions
            .iter()
            .find(|s| s.user_id == session.user_id && s.session_date == session.session_date)
        {
            return Ok(existing.clone());
        }
        state.sessions.push(session.clone());
        Ok(session.clone())
    }

    async fn record_answer(
        &self,
        answer: &SessionAnswer,
        history: &QuestionHistory,
    ) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let owner = state
            .sessions
            .iter()
            .find(|s| s.id == answer.session_id)
            .map(|s| s.user_id.clone())
            .ok_or_else(|| StorageError::NotFound {
                entity: "daily_session",
                id: answer.session_id.clone(),
            })?;
        state.check_fault("record_answer", &owner)?;
        state.check_fault("upsert_history", &history.user_id)?;
        state.answers.push(answer.clone());
        state
            .history
            .insert((history.user_id.clone(), history.question_id.clone()), history.clone());
        Ok(())
    }

    async fn get_session_answers(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionAnswer>, StorageError> {
        let state = self.state.read().await;
        Ok(state.answers.iter().filter(|a| a.session_id == session_id).cloned().collect())
    }

    async fn complete_session(
        &self,
        completion: &SessionCompletion,
    ) -> Result<Option<UserProfile>, StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("complete_session", &completion.user_id)?;

        let session_idx =
            state.sessions.iter().position(|s| s.id == completion.session_id).ok_or_else(
                || StorageError::NotFound {
                    entity: "daily_session",
                    id: completion.session_id.clone(),
                },
            )?;
        if state.sessions[session_idx].completed {
            return Ok(None);
        }

        // Validate the profile before touching anything so a failure leaves no partial write.
        let mut profile = state.profiles.get(&completion.user_id).cloned().ok_or_else(|| {
            StorageError::NotFound { entity: "user_profile", id: completion.user_id.clone() }
        })?;
        profile.record_completion(
            completion.session_date,
            completion.questions_answered,
            completion.correct_answers,
            completion.completed_at,
        );

        let session = &mut state.sessions[session_idx];
        session.questions_answered = completion.questions_answered;
        session.correct_answers = completion.correct_answers;
        session.completed = true;
        session.completed_at = Some(completion.completed_at);
        state.profiles.insert(profile.id.clone(), profile.clone());
        Ok(Some(profile))
    }

    async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DailySession>, StorageError> {
        let state = self.state.read().await;
        let mut sessions: Vec<DailySession> =
            state.sessions.iter().filter(|s| s.user_id == user_id).cloned().collect();
        sessions.sort_by(|a, b| b.session_date.cmp(&a.session_date));
        sessions.truncate(limit);
        Ok(sessions)
    }
}

#[async_trait]
impl ProfileStore for MemoryStorage {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let state = self.state.read().await;
        state.check_fault("get_profile", user_id)?;
        Ok(state.profiles.get(user_id).cloned())
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.state.write().await.profiles.insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn list_active_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        let state = self.state.read().await;
        state.check_fault("list_active_profiles", "*")?;
        let mut profiles: Vec<UserProfile> =
            state.profiles.values().filter(|p| p.subscription_active).cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }
}

#[async_trait]
impl LedgerStore for MemoryStorage {
    async fn insert_penalty_if_absent(&self, penalty: &Transaction) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("insert_penalty_if_absent", &penalty.user_id)?;
        let exists = state.transactions.iter().any(|t| {
            t.user_id == penalty.user_id
                && t.missed_date == penalty.missed_date
                && t.transaction_type == TransactionType::Penalty
        });
        if exists {
            return Ok(false);
        }
        state.transactions.push(penalty.clone());
        Ok(true)
    }

    async fn archive_and_reset_streak(&self, record: &StreakRecord) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        state.check_fault("archive_and_reset_streak", &record.user_id)?;
        let Some(profile) = state.profiles.get_mut(&record.user_id) else {
            return Err(StorageError::NotFound {
                entity: "user_profile",
                id: record.user_id.clone(),
            });
        };
        if profile.streak_count != record.streak_length
            || profile.last_session_date != Some(record.end_date)
        {
            return Ok(false);
        }
        profile.streak_count = 0;
        profile.updated_at = record.created_at;
        state.streak_records.push(record.clone());
        Ok(true)
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, StorageError> {
        let state = self.state.read().await;
        let mut txs: Vec<Transaction> =
            state.transactions.iter().filter(|t| t.user_id == user_id).cloned().collect();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        txs.truncate(limit);
        Ok(txs)
    }

    async fn list_streak_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        let state = self.state.read().await;
        let mut records: Vec<StreakRecord> =
            state.streak_records.iter().filter(|r| r.user_id == user_id).cloned().collect();
        records.sort_by(|a, b| b.end_date.cmp(&a.end_date));
        records.truncate(limit);
        Ok(records)
    }
}
