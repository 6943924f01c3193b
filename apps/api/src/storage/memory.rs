#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use super::{BlobError, BlobStore, StoredBlob};

/// In-memory blob store for tests and local runs without object storage.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<Uuid, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, BlobError> {
        let id = Uuid::new_v4();
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| BlobError::Unavailable("blob lock poisoned".to_string()))?;
        blobs.insert(
            id,
            StoredBlob {
                bytes,
                filename: filename.to_string(),
                content_type: content_type.to_string(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<StoredBlob, BlobError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| BlobError::Unavailable("blob lock poisoned".to_string()))?;
        blobs.get(&id).cloned().ok_or(BlobError::NotFound(id))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, BlobError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| BlobError::Unavailable("blob lock poisoned".to_string()))?;
        Ok(blobs.contains_key(&id))
    }
}
