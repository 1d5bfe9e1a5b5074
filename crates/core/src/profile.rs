use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate practice state of one user.
///
/// `longest_streak >= streak_count` always holds. Only session completion grows
/// `streak_count`; only the reconciler resets it to zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub selected_certification_id: Option<String>,
    pub streak_count: i32,
    pub longest_streak: i32,
    pub last_session_date: Option<NaiveDate>,
    pub total_questions_answered: i64,
    pub total_correct_answers: i64,
    pub subscription_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of folding one completed session into a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEffect {
    pub streak_incremented: bool,
    pub streak_count: i32,
    pub longest_streak: i32,
}

impl UserProfile {
    #[must_use]
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            selected_certification_id: None,
            streak_count: 0,
            longest_streak: 0,
            last_session_date: None,
            total_questions_answered: 0,
            total_correct_answers: 0,
            subscription_active: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a completed session for `today`.
    ///
    /// The streak grows by one unless a session was already completed today.
    pub fn record_completion(
        &mut self,
        today: NaiveDate,
        questions_answered: i32,
        correct_answers: i32,
        now: DateTime<Utc>,
    ) -> CompletionEffect {
        let streak_incremented = self.last_session_date != Some(today);
        if streak_incremented {
            self.streak_count = self.streak_count.saturating_add(1);
        }
        self.longest_streak = self.longest_streak.max(self.streak_count);
        self.last_session_date = Some(today);
        self.total_questions_answered =
            self.total_questions_answered.saturating_add(i64::from(questions_answered.max(0)));
        self.total_correct_answers =
            self.total_correct_answers.saturating_add(i64::from(correct_answers.max(0)));
        self.updated_at = now;
        CompletionEffect {
            streak_incremented,
            streak_count: self.streak_count,
            longest_streak: self.longest_streak,
        }
    }

    /// Whether the most recently closed day went without a completed session.
    #[must_use]
    pub fn missed_day(&self, yesterday: NaiveDate) -> bool {
        self.last_session_date.is_some_and(|last| last < yesterday)
    }
}

/// First day of a streak of `streak_length` days ending on `end_date`.
///
/// Anchored on the last completed day, inclusive: a 5-day streak ending
/// 2024-01-01 started 2023-12-28. Counting back from the reconcile date
/// instead (`today - streak_length`) would shift it by the days missed.
#[must_use]
pub fn streak_start_date(end_date: NaiveDate, streak_length: i32) -> NaiveDate {
    let back = u64::try_from(streak_length.saturating_sub(1)).unwrap_or(0);
    end_date.checked_sub_days(Days::new(back)).unwrap_or(end_date)
}
