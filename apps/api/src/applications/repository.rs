use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationDraft, ApplicationRow, ApplicationStatus, EvaluationUpdate, Scores,
    Tier,
};

/// Error enumeration for record-store failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("illegal status transition {from} -> {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    /// Transient transport failure. Reads may be retried freely; writes must
    /// be retried by the caller or surfaced for resubmission.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub(crate) fn map_sqlx(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Unavailable(other.to_string()),
    }
}

/// Durable store for candidate applications. All reads return owned copies;
/// mutating a returned record never affects the store.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persists a draft: assigns id and timestamps, seeds `pending` status,
    /// placeholder tier, and zero-filled scores.
    async fn create(&self, draft: ApplicationDraft) -> Result<Application, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Application, RepositoryError>;

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<Application>, RepositoryError>;

    /// Newest first.
    async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<Application>, RepositoryError>;

    /// Applies a status transition if legal, atomically per record.
    async fn update_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;

    /// Stores the evaluator's scores/tier/payload verbatim, moves the record
    /// to `evaluated`, and stamps `last_evaluated_at`.
    async fn update_evaluation(
        &self,
        id: Uuid,
        update: EvaluationUpdate,
    ) -> Result<Application, RepositoryError>;
}

/// Postgres-backed repository. Transition legality is enforced inside the
/// UPDATE itself (`status = ANY($legal)`) so a concurrent reader sees either
/// the pre- or post-transition record, never a mix.
pub struct PgApplicationRepository {
    pool: PgPool,
}

impl PgApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: Uuid) -> Result<Option<String>, RepositoryError> {
        sqlx::query_scalar("SELECT status FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    /// Disambiguates a missed conditional update into `NotFound` vs
    /// `InvalidTransition`.
    async fn transition_failure(
        &self,
        id: Uuid,
        to: ApplicationStatus,
    ) -> Result<RepositoryError, RepositoryError> {
        match self.current_status(id).await? {
            Some(raw) => Ok(RepositoryError::InvalidTransition {
                from: ApplicationStatus::parse(&raw).unwrap_or(ApplicationStatus::Pending),
                to,
            }),
            None => Ok(RepositoryError::NotFound),
        }
    }
}

fn status_names(statuses: &[ApplicationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl ApplicationRepository for PgApplicationRepository {
    async fn create(&self, draft: ApplicationDraft) -> Result<Application, RepositoryError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let tier = Tier::placeholder();
        let scores = Scores::unevaluated();

        let row: ApplicationRow = sqlx::query_as(
            r#"
            INSERT INTO applications
                (id, job_id, company_id, first_name, last_name, email, phone,
                 linkedin, github, portfolio,
                 resume_file_id, resume_filename, resume_content_type, resume_upload_date,
                 status, tier_letter, tier_code, tier_level,
                 overall_score, content_score, design_score, projects_score, reasoning_summary,
                 evaluator_payload, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14,
                    $15, $16, $17, $18,
                    $19, $20, $21, $22, $23,
                    $24, $25, $26)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(draft.job_id)
        .bind(draft.company_id)
        .bind(&draft.personal_info.first_name)
        .bind(&draft.personal_info.last_name)
        .bind(&draft.personal_info.email)
        .bind(&draft.personal_info.phone)
        .bind(&draft.links.linkedin)
        .bind(&draft.links.github)
        .bind(&draft.links.portfolio)
        .bind(draft.resume.as_ref().map(|r| r.file_id))
        .bind(draft.resume.as_ref().map(|r| r.filename.clone()))
        .bind(draft.resume.as_ref().map(|r| r.content_type.clone()))
        .bind(draft.resume.as_ref().map(|r| r.upload_date))
        .bind(ApplicationStatus::Pending.as_str())
        .bind(tier.letter.as_str())
        .bind(&tier.code)
        .bind(tier.level)
        .bind(scores.overall_score)
        .bind(scores.content_score)
        .bind(scores.design_score)
        .bind(scores.projects_score)
        .bind(&scores.reasoning_summary)
        .bind(Value::Object(serde_json::Map::new()))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        info!("Created application {id} for job {}", draft.job_id);
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Application, RepositoryError> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx)?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<Application>, RepositoryError> {
        let rows: Vec<ApplicationRow> =
            sqlx::query_as("SELECT * FROM applications WHERE job_id = $1 ORDER BY created_at ASC")
                .bind(job_id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<Application>, RepositoryError> {
        let rows: Vec<ApplicationRow> = sqlx::query_as(
            "SELECT * FROM applications WHERE company_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let legal = status_names(&ApplicationStatus::legal_sources(next));

        let updated: Option<ApplicationRow> = sqlx::query_as(
            r#"
            UPDATE applications
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = ANY($4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(next.as_str())
        .bind(Utc::now())
        .bind(&legal)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match updated {
            Some(row) => {
                info!("Application {id} moved to {next}");
                Ok(row.into())
            }
            None => Err(self.transition_failure(id, next).await?),
        }
    }

    async fn update_evaluation(
        &self,
        id: Uuid,
        update: EvaluationUpdate,
    ) -> Result<Application, RepositoryError> {
        let evaluatable = status_names(&[ApplicationStatus::Pending, ApplicationStatus::Evaluated]);
        let now = Utc::now();

        let updated: Option<ApplicationRow> = sqlx::query_as(
            r#"
            UPDATE applications
            SET overall_score = $2, content_score = $3, design_score = $4,
                projects_score = $5, reasoning_summary = $6,
                tier_letter = $7, tier_code = $8, tier_level = $9,
                evaluator_payload = $10,
                status = $11, last_evaluated_at = $12, updated_at = $12
            WHERE id = $1 AND status = ANY($13)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.scores.overall_score)
        .bind(update.scores.content_score)
        .bind(update.scores.design_score)
        .bind(update.scores.projects_score)
        .bind(&update.scores.reasoning_summary)
        .bind(update.tier.letter.as_str())
        .bind(&update.tier.code)
        .bind(update.tier.level)
        .bind(&update.evaluator_payload)
        .bind(ApplicationStatus::Evaluated.as_str())
        .bind(now)
        .bind(&evaluatable)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match updated {
            Some(row) => {
                info!("Application {id} evaluated (tier {})", row.tier_code);
                Ok(row.into())
            }
            None => Err(self
                .transition_failure(id, ApplicationStatus::Evaluated)
                .await?),
        }
    }
}
