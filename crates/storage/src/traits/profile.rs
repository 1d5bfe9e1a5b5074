use async_trait::async_trait;
use streakcert_core::UserProfile;

use crate::error::StorageError;

/// User profile reads and writes.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError>;

    /// Insert or replace a profile. Profiles are created at sign-up, outside this system.
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Profiles with an active subscription.
    async fn list_active_profiles(&self) -> Result<Vec<UserProfile>, StorageError>;
}
