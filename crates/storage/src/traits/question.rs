use async_trait::async_trait;
use streakcert_core::{Certification, Question};

use crate::error::StorageError;

/// Certification catalogue and approved question content.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Get a certification by ID.
    async fn get_certification(&self, id: &str) -> Result<Option<Certification>, StorageError>;

    /// Insert or replace a certification.
    async fn save_certification(&self, certification: &Certification) -> Result<(), StorageError>;

    /// Insert or replace a question. Authoring happens outside this system.
    async fn save_question(&self, question: &Question) -> Result<(), StorageError>;

    /// All approved questions of a certification.
    async fn fetch_approved_questions(
        &self,
        certification_id: &str,
    ) -> Result<Vec<Question>, StorageError>;

    /// Questions by ID, in no particular order. Unknown IDs are skipped.
    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, StorageError>;

    /// Bump the reporting counters of a question.
    async fn increment_question_stats(
        &self,
        question_id: &str,
        correct: bool,
    ) -> Result<(), StorageError>;
}
