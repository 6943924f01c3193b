use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::CompanyId;
use crate::errors::AppError;
use crate::state::AppState;

use super::aggregate::{company_rollup, partition_by_tier, CompanyStats, JobTierBuckets};

/// GET /api/analytics/:form_id
///
/// Tier buckets for one job, keyed by its public form id.
pub async fn handle_job_tiers(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<JobTierBuckets>, AppError> {
    let job = state
        .jobs
        .find_by_public_form_id(&form_id)
        .await?
        .ok_or(AppError::JobNotFound(form_id))?;

    let applications = state.applications.find_by_job(job.id).await?;
    Ok(Json(partition_by_tier(&job.public_form_id, &applications)))
}

/// GET /api/stats
///
/// Company-wide rollup for the dashboard's polling loop. Pure read: safe at
/// high frequency, always reflects the latest committed records.
pub async fn handle_company_stats(
    State(state): State<AppState>,
    CompanyId(company_id): CompanyId,
) -> Result<Json<CompanyStats>, AppError> {
    let jobs = state.jobs.list_by_company(company_id).await?;
    let applications = state.applications.find_by_company(company_id).await?;
    Ok(Json(company_rollup(&jobs, &applications)))
}
