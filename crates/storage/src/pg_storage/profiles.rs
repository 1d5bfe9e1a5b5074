//! ProfileStore implementation for PgStorage.

use super::*;

use crate::traits::ProfileStore;
use async_trait::async_trait;

#[async_trait]
impl ProfileStore for PgStorage {
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_profile(&r)).transpose()
    }

    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO user_profiles ({PROFILE_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
             ON CONFLICT (id) DO UPDATE SET
               selected_certification_id = EXCLUDED.selected_certification_id,
               streak_count = EXCLUDED.streak_count,
               longest_streak = EXCLUDED.longest_streak,
               last_session_date = EXCLUDED.last_session_date,
               total_questions_answered = EXCLUDED.total_questions_answered,
               total_correct_answers = EXCLUDED.total_correct_answers,
               subscription_active = EXCLUDED.subscription_active,
               updated_at = EXCLUDED.updated_at"
        ))
        .bind(&profile.id)
        .bind(&profile.selected_certification_id)
        .bind(profile.streak_count)
        .bind(profile.longest_streak)
        .bind(profile.last_session_date)
        .bind(profile.total_questions_answered)
        .bind(profile.total_correct_answers)
        .bind(profile.subscription_active)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_active_profiles(&self) -> Result<Vec<UserProfile>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE subscription_active = TRUE ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_profile).collect()
    }
}
