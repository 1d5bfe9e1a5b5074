use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::AnswerOption;

/// One user's practice session for one UTC calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailySession {
    pub id: String,
    pub user_id: String,
    pub session_date: NaiveDate,
    pub certification_id: String,
    /// Batch chosen when the session was created, in presentation order.
    pub question_ids: Vec<String>,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl DailySession {
    #[must_use]
    pub fn new(
        id: String,
        user_id: String,
        session_date: NaiveDate,
        certification_id: String,
        question_ids: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            session_date,
            certification_id,
            question_ids,
            questions_answered: 0,
            correct_answers: 0,
            completed: false,
            completed_at: None,
            created_at,
        }
    }

    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        if self.completed { SessionStatus::Completed } else { SessionStatus::Active }
    }
}

/// Append-only record of one answered question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionAnswer {
    pub id: String,
    pub session_id: String,
    pub question_id: String,
    pub user_answer: AnswerOption,
    pub correct: bool,
    pub time_spent_seconds: i32,
    pub answered_at: DateTime<Utc>,
}

/// Final counts written when a session completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCompletion {
    pub session_id: String,
    pub user_id: String,
    pub session_date: NaiveDate,
    pub questions_answered: i32,
    pub correct_answers: i32,
    pub completed_at: DateTime<Utc>,
}
