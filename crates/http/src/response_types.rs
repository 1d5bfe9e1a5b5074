//! Response types (Serialize)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use streakcert_core::{DailySession, Question};
use streakcert_service::{AnsweredQuestion, PracticeSession, ReconcileReport, SessionStart};

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub backend: String,
}

/// A question as shown to the user; the correct option is withheld.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub question_text: String,
    pub options: [OptionView; 4],
    pub topic: String,
    pub difficulty_level: i32,
    pub answered: Option<AnsweredQuestion>,
}

#[derive(Debug, Serialize)]
pub struct OptionView {
    pub key: &'static str,
    pub text: String,
}

impl QuestionView {
    fn new(question: &Question, answered: Option<AnsweredQuestion>) -> Self {
        let option = |key: &'static str, text: &str| OptionView { key, text: text.to_owned() };
        Self {
            id: question.id.clone(),
            question_text: question.question_text.clone(),
            options: [
                option("A", &question.option_a),
                option("B", &question.option_b),
                option("C", &question.option_c),
                option("D", &question.option_d),
            ],
            topic: question.topic.clone(),
            difficulty_level: question.difficulty_level,
            answered,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionView {
    Active {
        session: DailySession,
        questions: Vec<QuestionView>,
        current_index: usize,
        answered: usize,
        correct: usize,
    },
    AlreadyCompleted {
        session: DailySession,
    },
    NoContent,
}

impl From<&PracticeSession> for SessionView {
    fn from(practice: &PracticeSession) -> Self {
        let questions = practice
            .questions
            .iter()
            .zip(&practice.answers)
            .map(|(q, a)| QuestionView::new(q, *a))
            .collect();
        Self::Active {
            session: practice.session.clone(),
            questions,
            current_index: practice.current_index,
            answered: practice.answered_count(),
            correct: practice.correct_count(),
        }
    }
}

impl From<SessionStart> for SessionView {
    fn from(start: SessionStart) -> Self {
        match start {
            SessionStart::Active(practice) => Self::from(&practice),
            SessionStart::AlreadyCompleted(session) => Self::AlreadyCompleted { session },
            SessionStart::NoContent => Self::NoContent,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub results: ReconcileReport,
    pub timestamp: DateTime<Utc>,
}
