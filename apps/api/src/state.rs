use std::sync::Arc;

use crate::applications::repository::ApplicationRepository;
use crate::config::Config;
use crate::jobs::repository::JobRepository;
use crate::storage::BlobStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators sit behind trait objects so the same handlers run against
/// Postgres + S3 in production and in-memory implementations in tests.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Config,
}
