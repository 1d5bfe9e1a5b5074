//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod history;
mod ledger;
mod profiles;
mod questions;
mod sessions;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use streakcert_core::{
    AnswerOption, Certification, DailySession, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, Question, QuestionHistory, SessionAnswer,
    StreakRecord, Transaction, TransactionStatus, TransactionType, UserProfile,
};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

fn parse_option(s: &str) -> Result<AnswerOption, StorageError> {
    s.parse::<AnswerOption>().map_err(|e| StorageError::corrupt(format!("answer option {s:?}"), e))
}

pub(crate) fn row_to_certification(row: &PgRow) -> Result<Certification, StorageError> {
    Ok(Certification {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        provider: row.try_get("provider")?,
        code: row.try_get("code")?,
        description: row.try_get("description")?,
        active: row.try_get("active")?,
    })
}

pub(crate) fn row_to_question(row: &PgRow) -> Result<Question, StorageError> {
    let correct: String = row.try_get("correct_answer")?;
    Ok(Question {
        id: row.try_get("id")?,
        certification_id: row.try_get("certification_id")?,
        question_text: row.try_get("question_text")?,
        option_a: row.try_get("option_a")?,
        option_b: row.try_get("option_b")?,
        option_c: row.try_get("option_c")?,
        option_d: row.try_get("option_d")?,
        correct_answer: parse_option(&correct)?,
        explanation: row.try_get("explanation")?,
        difficulty_level: row.try_get("difficulty_level")?,
        topic: row.try_get("topic")?,
        source_url: row.try_get("source_url")?,
        approved: row.try_get("approved")?,
        times_answered: row.try_get("times_answered")?,
        times_correct: row.try_get("times_correct")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_history(row: &PgRow) -> Result<QuestionHistory, StorageError> {
    Ok(QuestionHistory {
        user_id: row.try_get("user_id")?,
        question_id: row.try_get("question_id")?,
        times_seen: row.try_get("times_seen")?,
        times_correct: row.try_get("times_correct")?,
        mastery_level: row.try_get("mastery_level")?,
        last_seen_at: row.try_get("last_seen_at")?,
    })
}

pub(crate) fn row_to_session(row: &PgRow) -> Result<DailySession, StorageError> {
    let question_ids: serde_json::Value = row.try_get("question_ids")?;
    Ok(DailySession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        session_date: row.try_get("session_date")?,
        certification_id: row.try_get("certification_id")?,
        question_ids: serde_json::from_value(question_ids)?,
        questions_answered: row.try_get("questions_answered")?,
        correct_answers: row.try_get("correct_answers")?,
        completed: row.try_get("completed")?,
        completed_at: row.try_get("completed_at")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_answer(row: &PgRow) -> Result<SessionAnswer, StorageError> {
    let user_answer: String = row.try_get("user_answer")?;
    Ok(SessionAnswer {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        question_id: row.try_get("question_id")?,
        user_answer: parse_option(&user_answer)?,
        correct: row.try_get("correct")?,
        time_spent_seconds: row.try_get("time_spent_seconds")?,
        answered_at: row.try_get("answered_at")?,
    })
}

pub(crate) fn row_to_profile(row: &PgRow) -> Result<UserProfile, StorageError> {
    let last_session_date: Option<NaiveDate> = row.try_get("last_session_date")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(UserProfile {
        id: row.try_get("id")?,
        selected_certification_id: row.try_get("selected_certification_id")?,
        streak_count: row.try_get("streak_count")?,
        longest_streak: row.try_get("longest_streak")?,
        last_session_date,
        total_questions_answered: row.try_get("total_questions_answered")?,
        total_correct_answers: row.try_get("total_correct_answers")?,
        subscription_active: row.try_get("subscription_active")?,
        created_at,
        updated_at,
    })
}

pub(crate) fn row_to_transaction(row: &PgRow) -> Result<Transaction, StorageError> {
    let type_str: String = row.try_get("transaction_type")?;
    let status_str: String = row.try_get("status")?;
    let status = status_str.parse::<TransactionStatus>().unwrap_or_else(|_| {
        tracing::warn!(invalid_status = %status_str, "corrupt transaction status in DB, defaulting to Pending");
        TransactionStatus::Pending
    });
    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        transaction_type: type_str.parse::<TransactionType>()?,
        amount_minor: row.try_get("amount_minor")?,
        currency: row.try_get("currency")?,
        status,
        missed_date: row.try_get("missed_date")?,
        metadata: row.try_get("metadata")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_streak_record(row: &PgRow) -> Result<StreakRecord, StorageError> {
    Ok(StreakRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        streak_length: row.try_get("streak_length")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        completed_30_days: row.try_get("completed_30_days")?,
        refund_processed: row.try_get("refund_processed")?,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) const CERTIFICATION_COLUMNS: &str = "id, name, provider, code, description, active";

pub(crate) const QUESTION_COLUMNS: &str =
    "id, certification_id, question_text, option_a, option_b, option_c, option_d,
     correct_answer, explanation, difficulty_level, topic, source_url, approved,
     times_answered, times_correct, created_at";

pub(crate) const HISTORY_COLUMNS: &str =
    "user_id, question_id, times_seen, times_correct, mastery_level, last_seen_at";

pub(crate) const SESSION_COLUMNS: &str =
    "id, user_id, session_date, certification_id, question_ids, questions_answered,
     correct_answers, completed, completed_at, created_at";

pub(crate) const ANSWER_COLUMNS: &str =
    "id, session_id, question_id, user_answer, correct, time_spent_seconds, answered_at";

pub(crate) const PROFILE_COLUMNS: &str =
    "id, selected_certification_id, streak_count, longest_streak, last_session_date,
     total_questions_answered, total_correct_answers, subscription_active, created_at, updated_at";

pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, user_id, transaction_type, amount_minor, currency, status, missed_date, metadata, created_at";

pub(crate) const STREAK_COLUMNS: &str =
    "id, user_id, streak_length, start_date, end_date, completed_30_days, refund_processed, created_at";
