//! Daily streak/penalty reconciliation.
//!
//! Scans every subscribed user once per run. A user whose last completed
//! session is older than yesterday gets at most one penalty for yesterday and
//! has a running streak archived and reset. Rerunning for the same day is
//! safe: the penalty insert is existence-guarded and the reset is conditional
//! on the profile still matching what was read.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use streakcert_core::{Clock, StreakRecord, Transaction, UserProfile};
use streakcert_storage::StorageBackend;
use streakcert_storage::traits::{LedgerStore, ProfileStore};

use crate::ServiceError;

/// Aggregate counters for one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub checked: usize,
    pub penalties: usize,
    pub streaks_reset: usize,
    /// Users skipped because a storage step failed for them.
    pub failed: usize,
    #[serde(skip)]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct UserOutcome {
    penalized: bool,
    reset: bool,
}

pub struct StreakReconciler {
    storage: Arc<StorageBackend>,
    clock: Arc<dyn Clock>,
}

impl StreakReconciler {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Run one pass over all subscribed users.
    ///
    /// Only a failure to list users fails the run; a failing user is counted
    /// in `failed` and the pass continues.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ServiceError> {
        let now = self.clock.now();
        let yesterday = self.clock.yesterday();
        let profiles = self.storage.list_active_profiles().await?;

        let mut report = ReconcileReport {
            checked: profiles.len(),
            penalties: 0,
            streaks_reset: 0,
            failed: 0,
            timestamp: now,
        };

        for profile in &profiles {
            match self.reconcile_user(profile, yesterday, now).await {
                Ok(outcome) => {
                    report.penalties += usize::from(outcome.penalized);
                    report.streaks_reset += usize::from(outcome.reset);
                },
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        user_id = %profile.id,
                        error = %e,
                        transient = e.is_transient(),
                        "reconciliation failed for user, continuing"
                    );
                },
            }
        }

        tracing::info!(
            checked = report.checked,
            penalties = report.penalties,
            streaks_reset = report.streaks_reset,
            failed = report.failed,
            missed_date = %yesterday,
            "streak reconciliation finished"
        );
        Ok(report)
    }

    async fn reconcile_user(
        &self,
        profile: &UserProfile,
        yesterday: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<UserOutcome, ServiceError> {
        let mut outcome = UserOutcome::default();
        if !profile.missed_day(yesterday) {
            return Ok(outcome);
        }

        let penalty =
            Transaction::penalty(uuid::Uuid::new_v4().to_string(), profile, yesterday, now);
        outcome.penalized = self.storage.insert_penalty_if_absent(&penalty).await?;
        if outcome.penalized {
            tracing::info!(
                user_id = %profile.id,
                missed_date = %yesterday,
                previous_streak = profile.streak_count,
                "penalty recorded for missed day"
            );
        }

        if let Some(record) = StreakRecord::ended(uuid::Uuid::new_v4().to_string(), profile, now) {
            outcome.reset = self.storage.archive_and_reset_streak(&record).await?;
            if outcome.reset {
                tracing::info!(
                    user_id = %profile.id,
                    streak_length = record.streak_length,
                    start_date = %record.start_date,
                    end_date = %record.end_date,
                    "streak archived and reset"
                );
            } else {
                tracing::debug!(user_id = %profile.id, "profile changed since read, streak left as is");
            }
        }
        Ok(outcome)
    }
}
