//! Per-(user, question) exposure history and the mastery update rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MASTERY_PER_EXPOSURE, MAX_MASTERY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionHistory {
    pub user_id: String,
    pub question_id: String,
    pub times_seen: i32,
    pub times_correct: i32,
    pub mastery_level: i32,
    pub last_seen_at: DateTime<Utc>,
}

impl QuestionHistory {
    /// History for a question the user is about to see for the first time.
    ///
    /// Nothing is counted yet; call [`record_answer`](Self::record_answer) to
    /// register the exposure. The mastery formula applies from that first
    /// answer, so a correct first answer lands on 100 and a wrong one on 2;
    /// there is no separate starting value.
    #[must_use]
    pub fn unseen(user_id: &str, question_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_owned(),
            question_id: question_id.to_owned(),
            times_seen: 0,
            times_correct: 0,
            mastery_level: 0,
            last_seen_at: now,
        }
    }

    /// Fraction of exposures answered correctly, `0.0` when never seen.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.times_seen <= 0 {
            return 0.0;
        }
        f64::from(self.times_correct) / f64::from(self.times_seen)
    }

    /// Register one answer and recompute mastery.
    ///
    /// `times_correct <= times_seen` holds afterwards for any sequence of calls.
    pub fn record_answer(&mut self, correct: bool, now: DateTime<Utc>) {
        self.times_seen = self.times_seen.saturating_add(1);
        if correct {
            self.times_correct = self.times_correct.saturating_add(1);
        }
        self.times_correct = self.times_correct.min(self.times_seen);
        self.mastery_level = mastery_level(self.times_seen, self.times_correct);
        self.last_seen_at = now;
    }
}

/// `min(100, floor(success_rate * 100 + times_seen * 2))`, clamped to `[0, 100]`.
#[must_use]
pub fn mastery_level(times_seen: i32, times_correct: i32) -> i32 {
    if times_seen <= 0 {
        return 0;
    }
    let correct = times_correct.clamp(0, times_seen);
    let success_pct = (f64::from(correct) / f64::from(times_seen) * 100.0).floor();
    let repetition = f64::from(times_seen) * f64::from(MASTERY_PER_EXPOSURE);
    let raw = (success_pct + repetition).floor();
    #[allow(clippy::cast_possible_truncation, reason = "value is clamped to 0..=100 first")]
    let level = raw.clamp(0.0, f64::from(MAX_MASTERY)) as i32;
    level
}
