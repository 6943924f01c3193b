use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. `public_form_id` is the unguessable token that gates the
/// public application form; it is generated once and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_title: String,
    pub description: String,
    pub public_form_id: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a job. Id, form id, and timestamp are assigned by the
/// repository.
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub company_id: Uuid,
    pub job_title: String,
    pub description: String,
}
