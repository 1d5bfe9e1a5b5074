use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use streakcert_core::{Question, QuestionHistory, select_batch};
use streakcert_storage::StorageBackend;
use streakcert_storage::traits::{HistoryStore, QuestionStore};

use crate::ServiceError;

/// Builds a user's daily batch from stored history and the certification's
/// approved questions.
pub struct QuestionSelector {
    storage: Arc<StorageBackend>,
    rng: Mutex<StdRng>,
}

impl QuestionSelector {
    #[must_use]
    pub fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage, rng: Mutex::new(StdRng::from_entropy()) }
    }

    /// Selector with a fixed random source, for reproducible batches.
    #[must_use]
    pub fn with_seed(storage: Arc<StorageBackend>, seed: u64) -> Self {
        Self { storage, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    /// Up to ten questions ordered for presentation.
    ///
    /// An empty result means the certification has no approved content yet;
    /// callers treat it as a terminal "no content" state, not a failure.
    pub async fn select_daily_batch(
        &self,
        user_id: &str,
        certification_id: &str,
    ) -> Result<Vec<Question>, ServiceError> {
        let certification = self.storage.get_certification(certification_id).await?;
        match certification {
            Some(c) if c.active => {},
            Some(_) => {
                return Err(ServiceError::InvalidInput(format!(
                    "certification {certification_id} is not active"
                )));
            },
            None => {
                return Err(ServiceError::InvalidInput(format!(
                    "unknown certification {certification_id}"
                )));
            },
        }

        // History spans every certification the user has practised.
        let history: HashMap<String, QuestionHistory> = self
            .storage
            .fetch_history(user_id)
            .await?
            .into_iter()
            .map(|h| (h.question_id.clone(), h))
            .collect();
        let questions = self.storage.fetch_approved_questions(certification_id).await?;
        if questions.is_empty() {
            tracing::info!(certification_id, "no approved questions for certification");
            return Ok(Vec::new());
        }

        let batch = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_batch(&questions, &history, &mut *rng)
        };
        tracing::debug!(
            user_id,
            certification_id,
            batch_size = batch.len(),
            known = history.len(),
            "selected daily batch"
        );
        Ok(batch)
    }
}
