#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::applications::repository::RepositoryError;
use crate::models::job::{Job, JobDraft};

use super::repository::{new_public_form_id, JobRepository};

/// In-memory job store for tests and local runs without Postgres.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Job>>, RepositoryError> {
        self.jobs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("job lock poisoned".to_string()))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, draft: JobDraft) -> Result<Job, RepositoryError> {
        let job = Job {
            id: Uuid::new_v4(),
            company_id: draft.company_id,
            job_title: draft.job_title,
            description: draft.description,
            public_form_id: new_public_form_id(),
            created_at: Utc::now(),
        };

        self.lock()?.insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_by_public_form_id(
        &self,
        public_form_id: &str,
    ) -> Result<Option<Job>, RepositoryError> {
        let jobs = self.lock()?;
        Ok(jobs
            .values()
            .find(|j| j.public_form_id == public_form_id)
            .cloned())
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Job>, RepositoryError> {
        let jobs = self.lock()?;
        let mut found: Vec<Job> = jobs
            .values()
            .filter(|j| j.company_id == company_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn delete(&self, job_id: Uuid, company_id: Uuid) -> Result<(), RepositoryError> {
        let mut jobs = self.lock()?;
        match jobs.get(&job_id) {
            Some(job) if job.company_id == company_id => {
                jobs.remove(&job_id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }
}
