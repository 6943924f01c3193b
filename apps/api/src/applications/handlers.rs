use std::collections::HashMap;

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::repository::RepositoryError;
use crate::auth::CompanyId;
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationStatus, CandidateLinks, EvaluationUpdate, Scores, Tier,
};
use crate::state::AppState;

use super::intake::{submit_application, ResumeUpload, SubmissionForm};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicJobView {
    pub job_title: String,
    pub description: String,
}

/// GET /api/public/jobs/:form_id
pub async fn handle_get_public_job(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<PublicJobView>, AppError> {
    let job = state
        .jobs
        .find_by_public_form_id(&form_id)
        .await?
        .ok_or(AppError::JobNotFound(form_id))?;

    Ok(Json(PublicJobView {
        job_title: job.job_title,
        description: job.description,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub message: String,
}

/// POST /api/public/apply/:form_id
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApplyResponse>, AppError> {
    let form = read_submission_form(&mut multipart).await?;

    let application = submit_application(
        state.jobs.as_ref(),
        state.applications.as_ref(),
        state.blobs.as_ref(),
        &form_id,
        form,
    )
    .await?;

    Ok(Json(ApplyResponse {
        application_id: application.id,
        status: application.status,
        message: "Application submitted successfully".to_string(),
    }))
}

/// Pulls the public form's fields out of the multipart body. Field names are
/// the form's contract: `first_name`, `last_name`, `email`, `phone`,
/// `linkedin`, `github`, `portfolio`, and the file field `resume`.
async fn read_submission_form(multipart: &mut Multipart) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("could not read resume upload: {e}"))
                })?;
                form.resume = Some(ResumeUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            "first_name" => form.first_name = read_text(field).await?,
            "last_name" => form.last_name = read_text(field).await?,
            "email" => form.email = read_text(field).await?,
            "phone" => form.phone = non_empty(read_text(field).await?),
            "linkedin" => form.linkedin = non_empty(read_text(field).await?),
            "github" => form.github = non_empty(read_text(field).await?),
            "portfolio" => form.portfolio = non_empty(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListEntry {
    pub candidate_id: Uuid,
    pub name: String,
    /// Public form id while the job exists; the raw job id once deleted.
    pub job_id: String,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub scores: Scores,
    pub tier: Tier,
    pub links: CandidateLinks,
    pub filename: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// GET /api/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    CompanyId(company_id): CompanyId,
) -> Result<Json<Vec<CandidateListEntry>>, AppError> {
    let jobs = state.jobs.list_by_company(company_id).await?;
    let by_id: HashMap<Uuid, (&str, &str)> = jobs
        .iter()
        .map(|j| (j.id, (j.public_form_id.as_str(), j.job_title.as_str())))
        .collect();

    let applications = state.applications.find_by_company(company_id).await?;
    let entries = applications
        .into_iter()
        .map(|app| {
            let (job_id, job_title) = match by_id.get(&app.job_id) {
                Some((form_id, title)) => (form_id.to_string(), title.to_string()),
                None => (app.job_id.to_string(), "N/A".to_string()),
            };
            CandidateListEntry {
                candidate_id: app.id,
                name: app.personal_info.full_name(),
                job_id,
                job_title,
                status: app.status,
                scores: app.scores,
                tier: app.tier,
                links: app.links,
                filename: app.resume.map(|r| r.filename),
                created_at: app.created_at,
            }
        })
        .collect();

    Ok(Json(entries))
}

/// GET /api/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    CompanyId(_): CompanyId,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .applications
        .find_by_id(id)
        .await
        .map_err(candidate_not_found)?;
    Ok(Json(application))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub candidate_id: Uuid,
    pub status: ApplicationStatus,
    pub message: String,
}

/// PUT /api/candidates/:id/status
///
/// Operator-side transitions: an evaluated record into a terminal decision,
/// or a recruiter override between the two terminals.
pub async fn handle_update_status(
    State(state): State<AppState>,
    CompanyId(_): CompanyId,
    Path(id): Path<Uuid>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    let application = state
        .applications
        .update_status(id, req.status)
        .await
        .map_err(candidate_not_found)?;

    Ok(Json(StatusUpdateResponse {
        candidate_id: application.id,
        status: application.status,
        message: format!("Candidate status updated to {}", application.status),
    }))
}

/// PUT /api/candidates/:id/evaluation
///
/// Evaluator callback: stores scores/tier/payload verbatim and moves the
/// record to `evaluated`.
pub async fn handle_update_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<EvaluationUpdate>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .applications
        .update_evaluation(id, update)
        .await
        .map_err(candidate_not_found)?;
    Ok(Json(application))
}

/// GET /api/candidates/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    CompanyId(_): CompanyId,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let application = state
        .applications
        .find_by_id(id)
        .await
        .map_err(candidate_not_found)?;

    let resume = application
        .resume
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let blob = state.blobs.get(resume.file_id).await?;

    let headers = [
        (header::CONTENT_TYPE, blob.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", resume.filename),
        ),
    ];
    Ok((headers, blob.bytes).into_response())
}

fn candidate_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Candidate not found".to_string()),
        other => other.into(),
    }
}
