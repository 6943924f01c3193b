use bytes::Bytes;
use chrono::Utc;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::repository::JobRepository;
use crate::models::application::{
    Application, ApplicationDraft, CandidateLinks, PersonalInfo, ResumeRef,
};
use crate::storage::BlobStore;

use super::repository::ApplicationRepository;

/// One uploaded resume file, as extracted from the multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Raw public-form submission before validation.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub resume: Option<ResumeUpload>,
}

/// Accepts a public submission: resolves the form id, validates required
/// fields, commits the resume blob, then creates the application record.
///
/// The blob write must complete before the record create is attempted; a
/// failed blob write aborts the whole submission so the repository never
/// holds a reference to unwritten bytes. A blob orphaned by a late create
/// failure is acceptable and garbage-collectable; an orphan record reference
/// is not.
pub async fn submit_application(
    jobs: &dyn JobRepository,
    applications: &dyn ApplicationRepository,
    blobs: &dyn BlobStore,
    public_form_id: &str,
    form: SubmissionForm,
) -> Result<Application, AppError> {
    let job = jobs
        .find_by_public_form_id(public_form_id)
        .await?
        .ok_or_else(|| AppError::JobNotFound(public_form_id.to_string()))?;

    let personal_info = validate_personal_info(&form)?;

    let resume = match form.resume {
        Some(upload) => {
            let file_id = blobs
                .put(upload.bytes, &upload.filename, &upload.content_type)
                .await?;
            Some(ResumeRef {
                file_id,
                filename: upload.filename,
                content_type: upload.content_type,
                upload_date: Utc::now(),
            })
        }
        None => None,
    };

    let application = applications
        .create(ApplicationDraft {
            job_id: job.id,
            company_id: job.company_id,
            personal_info,
            links: CandidateLinks {
                linkedin: form.linkedin,
                github: form.github,
                portfolio: form.portfolio,
            },
            resume,
        })
        .await?;

    info!(
        "Accepted application {} for job {}",
        application.id, job.id
    );
    Ok(application)
}

fn validate_personal_info(form: &SubmissionForm) -> Result<PersonalInfo, AppError> {
    let first_name = form.first_name.trim();
    let last_name = form.last_name.trim();
    let email = form.email.trim();

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "first name, last name, and email are required".to_string(),
        ));
    }

    Ok(PersonalInfo {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: form
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::memory::InMemoryApplicationRepository;
    use crate::jobs::memory::InMemoryJobRepository;
    use crate::models::application::ApplicationStatus;
    use crate::models::job::{Job, JobDraft};
    use crate::storage::{BlobError, InMemoryBlobStore, StoredBlob};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Blob store whose durable medium is down. Used to assert the
    /// no-orphan-record guarantee.
    struct FailingBlobStore;

    #[async_trait]
    impl BlobStore for FailingBlobStore {
        async fn put(&self, _: Bytes, _: &str, _: &str) -> Result<Uuid, BlobError> {
            Err(BlobError::Unavailable("disk full".to_string()))
        }

        async fn get(&self, id: Uuid) -> Result<StoredBlob, BlobError> {
            Err(BlobError::NotFound(id))
        }

        async fn exists(&self, _: Uuid) -> Result<bool, BlobError> {
            Ok(false)
        }
    }

    async fn seed_job(jobs: &InMemoryJobRepository) -> Job {
        jobs.create(JobDraft {
            company_id: Uuid::new_v4(),
            job_title: "Backend Engineer".to_string(),
            description: "Build the intake pipeline".to_string(),
        })
        .await
        .unwrap()
    }

    fn jane_doe(resume: Option<ResumeUpload>) -> SubmissionForm {
        SubmissionForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            resume,
            ..SubmissionForm::default()
        }
    }

    fn pdf_upload() -> ResumeUpload {
        ResumeUpload {
            filename: "jane-doe.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from(vec![0x25u8; 10 * 1024]),
        }
    }

    #[tokio::test]
    async fn submission_with_resume_round_trips_blob() {
        let jobs = InMemoryJobRepository::new();
        let applications = InMemoryApplicationRepository::new();
        let blobs = InMemoryBlobStore::new();
        let job = seed_job(&jobs).await;

        let upload = pdf_upload();
        let app = submit_application(
            &jobs,
            &applications,
            &blobs,
            &job.public_form_id,
            jane_doe(Some(upload.clone())),
        )
        .await
        .unwrap();

        assert_eq!(app.status, ApplicationStatus::Pending);
        let resume = app.resume.expect("resume reference stored");
        assert_eq!(resume.filename, "jane-doe.pdf");

        let blob = blobs.get(resume.file_id).await.unwrap();
        assert_eq!(blob.bytes, upload.bytes);
        assert_eq!(blob.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn blob_failure_aborts_submission_with_no_record() {
        let jobs = InMemoryJobRepository::new();
        let applications = InMemoryApplicationRepository::new();
        let job = seed_job(&jobs).await;

        let err = submit_application(
            &jobs,
            &applications,
            &FailingBlobStore,
            &job.public_form_id,
            jane_doe(Some(pdf_upload())),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert!(applications.find_by_job(job.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_form_id_is_job_not_found() {
        let jobs = InMemoryJobRepository::new();
        let applications = InMemoryApplicationRepository::new();
        let blobs = InMemoryBlobStore::new();
        let job = seed_job(&jobs).await;

        let err = submit_application(
            &jobs,
            &applications,
            &blobs,
            "no-such-form",
            jane_doe(Some(pdf_upload())),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::JobNotFound(_)));
        assert!(applications.find_by_job(job.id).await.unwrap().is_empty());
        assert!(applications
            .find_by_company(job.company_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn missing_required_fields_are_rejected() {
        let jobs = InMemoryJobRepository::new();
        let applications = InMemoryApplicationRepository::new();
        let blobs = InMemoryBlobStore::new();
        let job = seed_job(&jobs).await;

        let mut form = jane_doe(None);
        form.email = "   ".to_string();

        let err = submit_application(&jobs, &applications, &blobs, &job.public_form_id, form)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(applications.find_by_job(job.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submission_without_resume_is_accepted() {
        let jobs = InMemoryJobRepository::new();
        let applications = InMemoryApplicationRepository::new();
        let blobs = InMemoryBlobStore::new();
        let job = seed_job(&jobs).await;

        let app = submit_application(
            &jobs,
            &applications,
            &blobs,
            &job.public_form_id,
            jane_doe(None),
        )
        .await
        .unwrap();

        assert!(app.resume.is_none());
        assert_eq!(app.status, ApplicationStatus::Pending);
    }
}
