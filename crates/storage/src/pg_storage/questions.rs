//! QuestionStore implementation for PgStorage.

use super::*;

use crate::traits::QuestionStore;
use async_trait::async_trait;

#[async_trait]
impl QuestionStore for PgStorage {
    async fn get_certification(&self, id: &str) -> Result<Option<Certification>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CERTIFICATION_COLUMNS} FROM certifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_certification(&r)).transpose()
    }

    async fn save_certification(&self, certification: &Certification) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO certifications ({CERTIFICATION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6)
             ON CONFLICT (id) DO UPDATE SET
               name = EXCLUDED.name,
               provider = EXCLUDED.provider,
               code = EXCLUDED.code,
               description = EXCLUDED.description,
               active = EXCLUDED.active"
        ))
        .bind(&certification.id)
        .bind(&certification.name)
        .bind(&certification.provider)
        .bind(&certification.code)
        .bind(&certification.description)
        .bind(certification.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_question(&self, question: &Question) -> Result<(), StorageError> {
        sqlx::query(&format!(
            "INSERT INTO questions ({QUESTION_COLUMNS})
             VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16)
             ON CONFLICT (id) DO UPDATE SET
               certification_id = EXCLUDED.certification_id,
               question_text = EXCLUDED.question_text,
               option_a = EXCLUDED.option_a,
               option_b = EXCLUDED.option_b,
               option_c = EXCLUDED.option_c,
               option_d = EXCLUDED.option_d,
               correct_answer = EXCLUDED.correct_answer,
               explanation = EXCLUDED.explanation,
               difficulty_level = EXCLUDED.difficulty_level,
               topic = EXCLUDED.topic,
               source_url = EXCLUDED.source_url,
               approved = EXCLUDED.approved"
        ))
        .bind(&question.id)
        .bind(&question.certification_id)
        .bind(&question.question_text)
        .bind(&question.option_a)
        .bind(&question.option_b)
        .bind(&question.option_c)
        .bind(&question.option_d)
        .bind(question.correct_answer.as_str())
        .bind(&question.explanation)
        .bind(question.difficulty_level)
        .bind(&question.topic)
        .bind(&question.source_url)
        .bind(question.approved)
        .bind(question.times_answered)
        .bind(question.times_correct)
        .bind(question.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_approved_questions(
        &self,
        certification_id: &str,
    ) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions
             WHERE certification_id = $1 AND approved = TRUE"
        ))
        .bind(certification_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_question).collect()
    }

    async fn get_questions_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_question).collect()
    }

    async fn increment_question_stats(
        &self,
        question_id: &str,
        correct: bool,
    ) -> Result<(), StorageError> {
        let result = sqlx::query(
            "UPDATE questions
                SET times_answered = times_answered + 1,
                    times_correct = times_correct + CASE WHEN $2 THEN 1 ELSE 0 END
              WHERE id = $1",
        )
        .bind(question_id)
        .bind(correct)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity: "question", id: question_id.to_owned() });
        }
        Ok(())
    }
}
