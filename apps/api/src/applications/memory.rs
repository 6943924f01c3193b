#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationDraft, ApplicationStatus, EvaluationUpdate, Scores, Tier,
};

use super::repository::{ApplicationRepository, RepositoryError};

/// In-memory repository for tests and local runs without Postgres. Each
/// mutation happens under a single lock acquisition, so a concurrent reader
/// observes either the pre- or post-transition record, never a mix.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    records: Mutex<HashMap<Uuid, Application>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Application>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record lock poisoned".to_string()))
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, draft: ApplicationDraft) -> Result<Application, RepositoryError> {
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            job_id: draft.job_id,
            company_id: draft.company_id,
            personal_info: draft.personal_info,
            resume: draft.resume,
            links: draft.links,
            status: ApplicationStatus::Pending,
            tier: Tier::placeholder(),
            scores: Scores::unevaluated(),
            evaluator_payload: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
            last_evaluated_at: None,
        };

        self.lock()?
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Application, RepositoryError> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<Application>, RepositoryError> {
        let records = self.lock()?;
        let mut found: Vec<Application> = records
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        found.sort_by_key(|a| a.created_at);
        Ok(found)
    }

    async fn find_by_company(&self, company_id: Uuid) -> Result<Vec<Application>, RepositoryError> {
        let records = self.lock()?;
        let mut found: Vec<Application> = records
            .values()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn update_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut records = self.lock()?;
        let record = records.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        if !record.status.can_transition_to(next) {
            return Err(RepositoryError::InvalidTransition {
                from: record.status,
                to: next,
            });
        }

        record.status = next;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn update_evaluation(
        &self,
        id: Uuid,
        update: EvaluationUpdate,
    ) -> Result<Application, RepositoryError> {
        let mut records = self.lock()?;
        let record = records.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        if !record.status.accepts_evaluation() {
            return Err(RepositoryError::InvalidTransition {
                from: record.status,
                to: ApplicationStatus::Evaluated,
            });
        }

        let now = Utc::now();
        record.scores = update.scores;
        record.tier = update.tier;
        record.evaluator_payload = update.evaluator_payload;
        record.status = ApplicationStatus::Evaluated;
        record.last_evaluated_at = Some(now);
        record.updated_at = now;
        Ok(record.clone())
    }
}
