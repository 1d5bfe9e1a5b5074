use std::collections::HashMap;

use serde::Serialize;
use streakcert_core::{AnswerOption, DailySession, Question, SessionAnswer, UserProfile};

/// A daily session with its batch loaded and per-question answer marks.
#[derive(Debug, Clone, Serialize)]
pub struct PracticeSession {
    pub session: DailySession,
    pub questions: Vec<Question>,
    pub answers: Vec<Option<AnsweredQuestion>>,
    pub current_index: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub choice: AnswerOption,
    pub correct: bool,
}

/// Result of `DailySessionService::initialize`.
#[derive(Debug, Clone)]
pub enum SessionStart {
    /// Today's session was already completed; nothing left to do.
    AlreadyCompleted(DailySession),
    /// The certification has no approved questions.
    NoContent,
    Active(PracticeSession),
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub index: usize,
    pub question_id: String,
    pub correct: bool,
    pub correct_answer: AnswerOption,
    pub explanation: String,
    pub mastery_level: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Advance {
    Next { index: usize },
    Completed(CompletionSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionSummary {
    pub session: DailySession,
    /// False when the session had already been completed before this call.
    pub newly_completed: bool,
    pub streak_count: i32,
    pub longest_streak: i32,
    pub total_questions_answered: i64,
    pub total_correct_answers: i64,
}

impl CompletionSummary {
    pub(crate) fn new(session: DailySession, newly_completed: bool, profile: &UserProfile) -> Self {
        Self {
            session,
            newly_completed,
            streak_count: profile.streak_count,
            longest_streak: profile.longest_streak,
            total_questions_answered: profile.total_questions_answered,
            total_correct_answers: profile.total_correct_answers,
        }
    }
}

impl PracticeSession {
    /// Rebuild in-memory progress from the stored batch order and answer rows.
    ///
    /// `questions` may arrive in any order; they are laid out as
    /// `session.question_ids` says, skipping ids that no longer resolve. A
    /// session without a stored batch keeps `questions` as given.
    pub(crate) fn hydrate(
        session: DailySession,
        questions: Vec<Question>,
        stored: &[SessionAnswer],
    ) -> Self {
        let ordered: Vec<Question> = if session.question_ids.is_empty() {
            questions
        } else {
            let mut by_id: HashMap<String, Question> =
                questions.into_iter().map(|q| (q.id.clone(), q)).collect();
            session.question_ids.iter().filter_map(|id| by_id.remove(id)).collect()
        };
        if ordered.len() < session.question_ids.len() {
            tracing::warn!(
                session_id = %session.id,
                expected = session.question_ids.len(),
                found = ordered.len(),
                "stored batch references missing questions"
            );
        }

        let mut answers = vec![None; ordered.len()];
        let mut current_index = 0;
        for answer in stored {
            let slot = (0..ordered.len())
                .find(|&i| ordered[i].id == answer.question_id && answers[i].is_none());
            if let Some(i) = slot {
                answers[i] =
                    Some(AnsweredQuestion { choice: answer.user_answer, correct: answer.correct });
                current_index = i;
            }
        }

        Self { session, questions: ordered, answers, current_index }
    }

    /// Fresh session over a just-selected batch.
    pub(crate) fn start(session: DailySession, questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self { session, questions, answers, current_index: 0 }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().flatten().filter(|a| a.correct).count()
    }

    #[must_use]
    pub fn is_answered(&self, index: usize) -> bool {
        self.answers.get(index).is_some_and(Option::is_some)
    }

    /// Next unanswered position after `index`, wrapping to the front of the batch.
    #[must_use]
    pub fn next_unanswered_after(&self, index: usize) -> Option<usize> {
        let len = self.answers.len();
        (1..=len).map(|step| (index + step) % len).find(|&i| self.answers[i].is_none())
    }

    #[must_use]
    pub fn first_unanswered(&self) -> Option<usize> {
        self.answers.iter().position(Option::is_none)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }
}
