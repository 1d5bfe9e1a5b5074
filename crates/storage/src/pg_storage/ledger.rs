//! LedgerStore implementation for PgStorage.

use super::*;

use crate::traits::LedgerStore;
use async_trait::async_trait;

#[async_trait]
impl LedgerStore for PgStorage {
    async fn insert_penalty_if_absent(&self, penalty: &Transaction) -> Result<bool, StorageError> {
        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM transactions
              WHERE user_id = $1 AND missed_date = $2 AND transaction_type = $3",
        )
        .bind(&penalty.user_id)
        .bind(penalty.missed_date)
        .bind(penalty.transaction_type.as_str())
        .fetch_optional(&self.pool)
        .await?;
        if existing.is_some() {
            return Ok(false);
        }

        // The unique index settles a concurrent run that passed the check at the same time.
        let result = sqlx::query(&format!(
            "INSERT INTO transactions ({TRANSACTION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
             ON CONFLICT (user_id, missed_date, transaction_type) DO NOTHING"
        ))
        .bind(&penalty.id)
        .bind(&penalty.user_id)
        .bind(penalty.transaction_type.as_str())
        .bind(penalty.amount_minor)
        .bind(&penalty.currency)
        .bind(penalty.status.as_str())
        .bind(penalty.missed_date)
        .bind(&penalty.metadata)
        .bind(penalty.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn archive_and_reset_streak(&self, record: &StreakRecord) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await?;

        let reset = sqlx::query(
            "UPDATE user_profiles SET streak_count = 0, updated_at = $4
              WHERE id = $1 AND streak_count = $2 AND last_session_date = $3",
        )
        .bind(&record.user_id)
        .bind(record.streak_length)
        .bind(record.end_date)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;
        if reset.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(&format!(
            "INSERT INTO streak_records ({STREAK_COLUMNS}) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)"
        ))
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(record.streak_length)
        .bind(record.start_date)
        .bind(record.end_date)
        .bind(record.completed_30_days)
        .bind(record.refund_processed)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn list_transactions(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<Transaction>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_transaction).collect()
    }

    async fn list_streak_records(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<StreakRecord>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {STREAK_COLUMNS} FROM streak_records
             WHERE user_id = $1 ORDER BY end_date DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(usize_to_i64(limit))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_streak_record).collect()
    }
}
