//! Record-store operations consumed by the screening flow.
//!
//! The trait seams the store so evaluators can be exercised against an
//! in-memory fake; `PgScreeningStore` is the production implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::screening::{ApplicantRow, EvaluationCriteriaRow, FitCategory, JobRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for jobs, applicants, and criteria records.
/// Carried in `AppState` as `Arc<dyn ScreeningStore>`.
#[async_trait]
pub trait ScreeningStore: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError>;

    /// All applicants, or one job's applicants when `job_id` is given.
    /// Ordering is stable (by name, then id) so batch passes are reproducible.
    async fn list_applicants(&self, job_id: Option<Uuid>) -> Result<Vec<ApplicantRow>, StoreError>;

    async fn get_applicant(&self, id: Uuid) -> Result<Option<ApplicantRow>, StoreError>;

    /// Overwrites an applicant's category and reasoning together, in one write.
    /// Errors with `NotFound` if the applicant no longer exists.
    async fn update_applicant_evaluation(
        &self,
        id: Uuid,
        category: FitCategory,
        reasoning: &str,
    ) -> Result<(), StoreError>;

    /// Appends one criteria record. Criteria records are never updated or
    /// deleted; they are an audit trail.
    async fn insert_criteria(
        &self,
        job_id: Uuid,
        criteria: &str,
    ) -> Result<EvaluationCriteriaRow, StoreError>;
}

pub struct PgScreeningStore {
    pool: PgPool,
}

impl PgScreeningStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScreeningStore for PgScreeningStore {
    async fn list_jobs(&self) -> Result<Vec<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT id, title, description, skills FROM jobs ORDER BY title, id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT id, title, description, skills FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_applicants(&self, job_id: Option<Uuid>) -> Result<Vec<ApplicantRow>, StoreError> {
        let rows = match job_id {
            Some(job_id) => {
                sqlx::query_as::<_, ApplicantRow>(
                    r#"
                    SELECT id, job_id, name, resume_summary, category, reasoning
                    FROM applicants
                    WHERE job_id = $1
                    ORDER BY name, id
                    "#,
                )
                .bind(job_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ApplicantRow>(
                    r#"
                    SELECT id, job_id, name, resume_summary, category, reasoning
                    FROM applicants
                    ORDER BY name, id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn get_applicant(&self, id: Uuid) -> Result<Option<ApplicantRow>, StoreError> {
        Ok(sqlx::query_as::<_, ApplicantRow>(
            r#"
            SELECT id, job_id, name, resume_summary, category, reasoning
            FROM applicants
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_applicant_evaluation(
        &self,
        id: Uuid,
        category: FitCategory,
        reasoning: &str,
    ) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE applicants SET category = $1, reasoning = $2 WHERE id = $3")
                .bind(category.as_str())
                .bind(reasoning)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        info!("Updated applicant {id} evaluation to '{category}'");
        Ok(())
    }

    async fn insert_criteria(
        &self,
        job_id: Uuid,
        criteria: &str,
    ) -> Result<EvaluationCriteriaRow, StoreError> {
        let row = sqlx::query_as::<_, EvaluationCriteriaRow>(
            r#"
            INSERT INTO evaluation_criteria (id, job_id, criteria)
            VALUES ($1, $2, $3)
            RETURNING id, job_id, criteria, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(criteria)
        .fetch_one(&self.pool)
        .await?;

        info!("Recorded evaluation criteria {} for job {job_id}", row.id);
        Ok(row)
    }
}
