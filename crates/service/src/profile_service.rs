use std::sync::Arc;

use streakcert_core::{
    DailySession, MAX_LIST_LIMIT, StreakRecord, Transaction, UserProfile,
};
use streakcert_storage::StorageBackend;
use streakcert_storage::traits::{LedgerStore, ProfileStore, SessionStore};

use crate::ServiceError;

/// Read side for dashboards: profile, ledger and session history.
pub struct ProfileService {
    storage: Arc<StorageBackend>,
}

impl ProfileService {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfile, ServiceError> {
        self.storage
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ServiceError::profile_not_found(user_id))
    }

    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, ServiceError> {
        Ok(self.storage.list_transactions(user_id, limit.min(MAX_LIST_LIMIT)).await?)
    }

    pub async fn list_streak_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StreakRecord>, ServiceError> {
        Ok(self.storage.list_streak_records(user_id, limit.min(MAX_LIST_LIMIT)).await?)
    }

    pub async fn recent_sessions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<DailySession>, ServiceError> {
        Ok(self.storage.recent_sessions(user_id, limit.min(MAX_LIST_LIMIT)).await?)
    }
}
