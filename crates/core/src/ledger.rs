//! Commitment ledger: penalty transactions and archived streaks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    MISSED_SESSION_REASON, PENALTY_AMOUNT_MINOR, PENALTY_CURRENCY, REFUND_STREAK_DAYS,
};
use crate::profile::streak_start_date;
use crate::{CoreError, UserProfile};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Penalty,
    Refund,
}

impl TransactionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Penalty => "penalty",
            Self::Refund => "refund",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "penalty" => Ok(Self::Penalty),
            "refund" => Ok(Self::Refund),
            other => Err(CoreError::InvalidTransactionType(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::InvalidTransactionStatus(other.to_owned())),
        }
    }
}

/// A ledger entry. Money movement happens elsewhere; this only records the decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub transaction_type: TransactionType,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    pub currency: String,
    pub status: TransactionStatus,
    pub missed_date: Option<NaiveDate>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Pending penalty for `missed_date`, carrying the streak the user had.
    #[must_use]
    pub fn penalty(
        id: String,
        profile: &UserProfile,
        missed_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id: profile.id.clone(),
            transaction_type: TransactionType::Penalty,
            amount_minor: PENALTY_AMOUNT_MINOR,
            currency: PENALTY_CURRENCY.to_owned(),
            status: TransactionStatus::Pending,
            missed_date: Some(missed_date),
            metadata: serde_json::json!({
                "previous_streak": profile.streak_count,
                "reason": MISSED_SESSION_REASON,
            }),
            created_at: now,
        }
    }
}

/// Snapshot of a streak that ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakRecord {
    pub id: String,
    pub user_id: String,
    pub streak_length: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub completed_30_days: bool,
    pub refund_processed: bool,
    pub created_at: DateTime<Utc>,
}

impl StreakRecord {
    /// Archive the profile's current streak, or `None` when there is nothing to archive.
    #[must_use]
    pub fn ended(id: String, profile: &UserProfile, now: DateTime<Utc>) -> Option<Self> {
        let end_date = profile.last_session_date?;
        (profile.streak_count > 0).then(|| Self {
            id,
            user_id: profile.id.clone(),
            streak_length: profile.streak_count,
            start_date: streak_start_date(end_date, profile.streak_count),
            end_date,
            completed_30_days: profile.streak_count >= REFUND_STREAK_DAYS,
            refund_processed: false,
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_date;

    fn profile(streak: i32, last: &str) -> UserProfile {
        let mut p = UserProfile::new("user-7", Utc::now());
        p.streak_count = streak;
        p.longest_streak = streak;
        p.last_session_date = Some(parse_date(last).unwrap());
        p.subscription_active = true;
        p
    }

    #[test]
    fn penalty_uses_fixed_amount_and_currency() {
        let p = profile(5, "2024-01-01");
        let tx = Transaction::penalty("t1".into(), &p, parse_date("2024-01-04").unwrap(), Utc::now());
        assert_eq!(tx.amount_minor, 50);
        assert_eq!(tx.currency, "GBP");
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.transaction_type, TransactionType::Penalty);
        assert_eq!(tx.metadata["previous_streak"], 5);
        assert_eq!(tx.metadata["reason"], "missed_daily_session");
    }

    #[test]
    fn streak_record_flags_thirty_days() {
        let short = StreakRecord::ended("s1".into(), &profile(5, "2024-01-01"), Utc::now()).unwrap();
        assert_eq!(short.streak_length, 5);
        assert!(!short.completed_30_days);
        assert_eq!(short.end_date, parse_date("2024-01-01").unwrap());
        assert_eq!(short.start_date, parse_date("2023-12-28").unwrap());

        let long = StreakRecord::ended("s2".into(), &profile(30, "2024-02-10"), Utc::now()).unwrap();
        assert!(long.completed_30_days);
        assert!(!long.refund_processed);
    }

    #[test]
    fn zero_streak_has_nothing_to_archive() {
        assert!(StreakRecord::ended("s".into(), &profile(0, "2024-01-01"), Utc::now()).is_none());
    }

    #[test]
    fn transaction_type_round_trips_through_str() {
        for t in [TransactionType::Penalty, TransactionType::Refund] {
            assert_eq!(t.as_str().parse::<TransactionType>(), Ok(t));
        }
        assert!("charge".parse::<TransactionType>().is_err());
    }
}
