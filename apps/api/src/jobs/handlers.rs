use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::applications::repository::RepositoryError;
use crate::auth::CompanyId;
use crate::errors::AppError;
use crate::models::job::{Job, JobDraft};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub job_title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub message: String,
    pub job_id: Uuid,
    pub public_form_id: String,
    pub public_form_link: String,
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    CompanyId(company_id): CompanyId,
    Json(req): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, AppError> {
    let job_title = req.job_title.trim();
    if job_title.is_empty() {
        return Err(AppError::Validation("jobTitle is required".to_string()));
    }

    let job = state
        .jobs
        .create(JobDraft {
            company_id,
            job_title: job_title.to_string(),
            description: req.description,
        })
        .await?;

    let public_form_link = format!(
        "{}/apply/{}",
        state.config.public_base_url, job.public_form_id
    );

    Ok(Json(CreateJobResponse {
        message: "Job created successfully".to_string(),
        job_id: job.id,
        public_form_id: job.public_form_id,
        public_form_link,
    }))
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    CompanyId(company_id): CompanyId,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = state.jobs.list_by_company(company_id).await?;
    Ok(Json(jobs))
}

/// DELETE /api/jobs/:job_id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    CompanyId(company_id): CompanyId,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state
        .jobs
        .delete(job_id, company_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Job not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(json!({ "message": "Job deleted successfully" })))
}
