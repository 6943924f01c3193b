use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::applications::repository::{map_sqlx, RepositoryError};
use crate::models::job::{Job, JobDraft};

/// Durable store for job postings. The public form id assigned at creation
/// is the only handle the unauthenticated world ever sees.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Persists a draft: assigns id, a fresh unguessable public form id, and
    /// the creation timestamp.
    async fn create(&self, draft: JobDraft) -> Result<Job, RepositoryError>;

    async fn find_by_public_form_id(
        &self,
        public_form_id: &str,
    ) -> Result<Option<Job>, RepositoryError>;

    /// Newest first.
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Job>, RepositoryError>;

    /// Deletes a job owned by `company_id`. Applications are intentionally
    /// kept; they remain queryable for historical analytics.
    async fn delete(&self, job_id: Uuid, company_id: Uuid) -> Result<(), RepositoryError>;
}

/// Generates the public form identifier: a v4 UUID, drawn from the OS
/// CSPRNG, so the token is unguessable.
pub(crate) fn new_public_form_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn create(&self, draft: JobDraft) -> Result<Job, RepositoryError> {
        let id = Uuid::new_v4();
        let public_form_id = new_public_form_id();

        let job: Job = sqlx::query_as(
            r#"
            INSERT INTO jobs (id, company_id, job_title, description, public_form_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.company_id)
        .bind(&draft.job_title)
        .bind(&draft.description)
        .bind(&public_form_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        info!("Created job {id} for company {}", draft.company_id);
        Ok(job)
    }

    async fn find_by_public_form_id(
        &self,
        public_form_id: &str,
    ) -> Result<Option<Job>, RepositoryError> {
        sqlx::query_as("SELECT * FROM jobs WHERE public_form_id = $1")
            .bind(public_form_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Job>, RepositoryError> {
        sqlx::query_as("SELECT * FROM jobs WHERE company_id = $1 ORDER BY created_at DESC")
            .bind(company_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn delete(&self, job_id: Uuid, company_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND company_id = $2")
            .bind(job_id)
            .bind(company_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("Deleted job {job_id}");
        Ok(())
    }
}
