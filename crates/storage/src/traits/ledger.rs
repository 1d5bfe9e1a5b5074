use async_trait::async_trait;
use streakcert_core::{StreakRecord, Transaction};

use crate::error::StorageError;

/// Penalty transactions and archived streaks.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Insert a penalty unless one already exists for its (user, missed date, type).
    ///
    /// Returns `true` if a row was inserted.
    async fn insert_penalty_if_absent(&self, penalty: &Transaction) -> Result<bool, StorageError>;

    /// Archive a broken streak and reset the owner's `streak_count` to zero, atomically.
    ///
    /// Conditional on the profile still having `streak_count == record.streak_length`
    /// and `last_session_date == record.end_date`. Returns `false` and writes
    /// nothing when the profile moved on in the meantime.
    async fn archive_and_reset_streak(&self, record: &StreakRecord) -> Result<bool, StorageError>;

    /// Transactions of a user, newest first.
    async fn list_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, StorageError>;

    /// Archived streaks of a user, newest first.
    async fn list_streak_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StreakRecord>, StorageError>;
}
