pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

pub use memory::InMemoryBlobStore;
pub use s3::S3BlobStore;

/// A committed blob together with the upload metadata it was stored with.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum BlobError {
    /// The durable medium could not accept or serve the request. Transient;
    /// callers may retry the whole operation.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    #[error("blob {0} not found")]
    NotFound(Uuid),
}

/// Append-only binary storage for resume files. A blob, once committed, is
/// never mutated; callers hold the returned id as a stable reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores content durably and returns its stable reference.
    async fn put(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, BlobError>;

    /// Retrieves committed bytes. Fails with `NotFound` for unknown ids.
    async fn get(&self, id: Uuid) -> Result<StoredBlob, BlobError>;

    async fn exists(&self, id: Uuid) -> Result<bool, BlobError>;
}
