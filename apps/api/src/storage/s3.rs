use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use super::{BlobError, BlobStore, StoredBlob};

/// Blob store backed by S3 (MinIO locally, AWS in production). Objects live
/// under `resumes/{id}`; the original filename travels in object metadata.
#[derive(Clone)]
pub struct S3BlobStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn key(id: Uuid) -> String {
        format!("resumes/{id}")
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Uuid, BlobError> {
        let id = Uuid::new_v4();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(Self::key(id))
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .metadata("filename", filename)
            .send()
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;

        info!("Stored resume blob {id} ({filename})");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<StoredBlob, BlobError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(Self::key(id))
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(service) if service.is_no_such_key() => BlobError::NotFound(id),
                _ => BlobError::Unavailable(e.to_string()),
            })?;

        let content_type = object
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = object
            .metadata()
            .and_then(|m| m.get("filename"))
            .cloned()
            .unwrap_or_else(|| "resume".to_string());

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| BlobError::Unavailable(e.to_string()))?;

        Ok(StoredBlob {
            bytes: data.into_bytes(),
            filename,
            content_type,
        })
    }

    async fn exists(&self, id: Uuid) -> Result<bool, BlobError> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(Self::key(id))
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => match e.as_service_error() {
                Some(service) if service.is_not_found() => Ok(false),
                _ => Err(BlobError::Unavailable(e.to_string())),
            },
        }
    }
}
