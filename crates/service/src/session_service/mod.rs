//! Daily session state machine: initialize, answer, advance, complete.
//!
//! One session exists per user per UTC date. The batch is fixed when the
//! session is created and stored with it, so resuming later in the day
//! presents the same questions with the already-answered ones marked.

mod practice;

use std::sync::Arc;

use streakcert_core::{
    AnswerOption, Clock, DailySession, QuestionHistory, SessionAnswer, SessionCompletion,
};
use streakcert_storage::StorageBackend;
use streakcert_storage::traits::{HistoryStore, ProfileStore, QuestionStore, SessionStore};

pub use practice::{
    Advance, AnswerOutcome, AnsweredQuestion, CompletionSummary, PracticeSession, SessionStart,
};

use crate::{QuestionSelector, ServiceError};

pub struct DailySessionService {
    storage: Arc<StorageBackend>,
    selector: Arc<QuestionSelector>,
    clock: Arc<dyn Clock>,
}

impl DailySessionService {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        selector: Arc<QuestionSelector>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { storage, selector, clock }
    }

    /// First touch of the day for `user_id`.
    ///
    /// `certification_id` overrides the profile's selected certification.
    pub async fn initialize(
        &self,
        user_id: &str,
        certification_id: Option<&str>,
    ) -> Result<SessionStart, ServiceError> {
        let profile = self
            .storage
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ServiceError::profile_not_found(user_id))?;
        let today = self.clock.today();

        if let Some(existing) = self.storage.get_daily_session(user_id, today).await? {
            if existing.completed {
                tracing::debug!(user_id, session_id = %existing.id, "daily session already completed");
                return Ok(SessionStart::AlreadyCompleted(existing));
            }
            return Ok(SessionStart::Active(self.hydrate(existing).await?));
        }

        let certification_id = certification_id
            .map(str::to_owned)
            .or(profile.selected_certification_id)
            .ok_or_else(|| ServiceError::InvalidInput("no certification selected".to_owned()))?;

        let batch = self.selector.select_daily_batch(user_id, &certification_id).await?;
        if batch.is_empty() {
            return Ok(SessionStart::NoContent);
        }

        let draft = DailySession::new(
            uuid::Uuid::new_v4().to_string(),
            user_id.to_owned(),
            today,
            certification_id,
            batch.iter().map(|q| q.id.clone()).collect(),
            self.clock.now(),
        );
        let stored = self.storage.create_daily_session(&draft).await?;
        if stored.id != draft.id {
            // Another request created today's session first; use theirs.
            tracing::debug!(user_id, session_id = %stored.id, "joined concurrently created session");
            if stored.completed {
                return Ok(SessionStart::AlreadyCompleted(stored));
            }
            return Ok(SessionStart::Active(self.hydrate(stored).await?));
        }

        tracing::info!(
            user_id,
            session_id = %stored.id,
            session_date = %today,
            batch_size = batch.len(),
            "daily session created"
        );
        Ok(SessionStart::Active(PracticeSession::start(stored, batch)))
    }

    /// Reload today's in-progress session from storage.
    pub async fn resume(&self, user_id: &str) -> Result<PracticeSession, ServiceError> {
        let today = self.clock.today();
        let session = self
            .storage
            .get_daily_session(user_id, today)
            .await?
            .ok_or(ServiceError::NoActiveSession)?;
        if session.completed {
            return Err(ServiceError::SessionCompleted);
        }
        self.hydrate(session).await
    }

    async fn hydrate(&self, session: DailySession) -> Result<PracticeSession, ServiceError> {
        let questions = if session.question_ids.is_empty() {
            // Rows written before batches were stored: draw afresh.
            self.selector.select_daily_batch(&session.user_id, &session.certification_id).await?
        } else {
            self.storage.get_questions_by_ids(&session.question_ids).await?
        };
        let stored = self.storage.get_session_answers(&session.id).await?;
        Ok(PracticeSession::hydrate(session, questions, &stored))
    }

    /// Record the answer to question `index` and update mastery.
    ///
    /// The answer row and the history row are written together, so a failed
    /// call leaves nothing behind and can be retried, even after a resume.
    pub async fn answer(
        &self,
        practice: &mut PracticeSession,
        index: usize,
        choice: AnswerOption,
        time_spent_seconds: i32,
    ) -> Result<AnswerOutcome, ServiceError> {
        if practice.session.completed {
            return Err(ServiceError::SessionCompleted);
        }
        let len = practice.questions.len();
        let question = practice
            .questions
            .get(index)
            .ok_or(ServiceError::IndexOutOfRange { index, len })?;
        if practice.is_answered(index) {
            return Err(ServiceError::AlreadyAnswered(index));
        }

        let user_id = practice.session.user_id.clone();
        let now = self.clock.now();
        let correct = question.is_correct(choice);

        let mut history = self
            .storage
            .get_history(&user_id, &question.id)
            .await?
            .unwrap_or_else(|| QuestionHistory::unseen(&user_id, &question.id, now));
        history.record_answer(correct, now);

        self.storage
            .record_answer(
                &SessionAnswer {
                    id: uuid::Uuid::new_v4().to_string(),
                    session_id: practice.session.id.clone(),
                    question_id: question.id.clone(),
                    user_answer: choice,
                    correct,
                    time_spent_seconds: time_spent_seconds.max(0),
                    answered_at: now,
                },
                &history,
            )
            .await?;

        if let Err(e) = self.storage.increment_question_stats(&question.id, correct).await {
            tracing::warn!(error = %e, question_id = %question.id, "failed to update question stats");
        }

        let outcome = AnswerOutcome {
            index,
            question_id: question.id.clone(),
            correct,
            correct_answer: question.correct_answer,
            explanation: question.explanation.clone(),
            mastery_level: history.mastery_level,
        };
        practice.answers[index] = Some(AnsweredQuestion { choice, correct });
        practice.current_index = index;
        tracing::debug!(
            user_id = %user_id,
            session_id = %practice.session.id,
            index,
            correct,
            mastery = history.mastery_level,
            "answer recorded"
        );
        Ok(outcome)
    }

    /// Move past the answered current question, completing the session once
    /// every question in the batch has an answer.
    pub async fn advance(&self, practice: &mut PracticeSession) -> Result<Advance, ServiceError> {
        if practice.session.completed {
            return Err(ServiceError::SessionCompleted);
        }
        if !practice.is_answered(practice.current_index) {
            return Err(ServiceError::Unanswered { index: practice.current_index });
        }
        match practice.next_unanswered_after(practice.current_index) {
            Some(next) => {
                practice.current_index = next;
                Ok(Advance::Next { index: next })
            },
            None => Ok(Advance::Completed(self.complete(practice).await?)),
        }
    }

    /// Close the session and fold its results into the user's profile.
    ///
    /// Every question in the batch must be answered first. Completing an
    /// already-completed session returns the stored outcome without touching
    /// the streak again.
    pub async fn complete(
        &self,
        practice: &mut PracticeSession,
    ) -> Result<CompletionSummary, ServiceError> {
        let user_id = practice.session.user_id.clone();
        if practice.session.completed {
            return self.completed_summary(practice.session.clone(), false).await;
        }
        if practice.questions.is_empty() {
            return Err(ServiceError::Unanswered { index: 0 });
        }
        if let Some(index) = practice.first_unanswered() {
            return Err(ServiceError::Unanswered { index });
        }

        let completion = SessionCompletion {
            session_id: practice.session.id.clone(),
            user_id: user_id.clone(),
            session_date: practice.session.session_date,
            questions_answered: count_i32(practice.answered_count()),
            correct_answers: count_i32(practice.correct_count()),
            completed_at: self.clock.now(),
        };

        match self.storage.complete_session(&completion).await? {
            Some(profile) => {
                let session = &mut practice.session;
                session.questions_answered = completion.questions_answered;
                session.correct_answers = completion.correct_answers;
                session.completed = true;
                session.completed_at = Some(completion.completed_at);
                tracing::info!(
                    user_id = %user_id,
                    session_id = %session.id,
                    answered = completion.questions_answered,
                    correct = completion.correct_answers,
                    streak = profile.streak_count,
                    "daily session completed"
                );
                Ok(CompletionSummary::new(session.clone(), true, &profile))
            },
            None => {
                let stored = self
                    .storage
                    .get_daily_session(&user_id, practice.session.session_date)
                    .await?
                    .unwrap_or_else(|| practice.session.clone());
                practice.session = stored.clone();
                self.completed_summary(stored, false).await
            },
        }
    }

    /// Complete today's session by user, tolerating one that is already done.
    pub async fn complete_today(&self, user_id: &str) -> Result<CompletionSummary, ServiceError> {
        let session = self
            .storage
            .get_daily_session(user_id, self.clock.today())
            .await?
            .ok_or(ServiceError::NoActiveSession)?;
        if session.completed {
            return self.completed_summary(session, false).await;
        }
        let mut practice = self.hydrate(session).await?;
        self.complete(&mut practice).await
    }

    async fn completed_summary(
        &self,
        session: DailySession,
        newly_completed: bool,
    ) -> Result<CompletionSummary, ServiceError> {
        let profile = self
            .storage
            .get_profile(&session.user_id)
            .await?
            .ok_or_else(|| ServiceError::profile_not_found(&session.user_id))?;
        Ok(CompletionSummary::new(session, newly_completed, &profile))
    }
}

fn count_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
