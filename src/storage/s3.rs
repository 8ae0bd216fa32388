//! AWS S3 storage implementation.
//!
//! The snapshot lives at `{bucket}/{prefix}/notice-data.json`. A missing
//! object (`NoSuchKey`) is treated as a cold start.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use crate::error::{AppError, Result};
use crate::models::Snapshot;
use crate::storage::SnapshotStore;

const SNAPSHOT_FILE: &str = "notice-data.json";

/// S3-based snapshot storage.
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    /// Create a new S3 storage instance.
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create S3 storage from environment configuration.
    ///
    /// - `S3_BUCKET` (default: `notice-bot`)
    /// - `S3_PREFIX` (default: `maplestory`)
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "notice-bot".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "maplestory".to_string());

        Self::new(client, bucket, prefix)
    }

    pub fn prefix(&self) -> &str {
        self.prefix.trim_matches('/')
    }

    fn snapshot_key(&self) -> String {
        match self.prefix() {
            "" => SNAPSHOT_FILE.to_string(),
            prefix => format!("{}/{}", prefix, SNAPSHOT_FILE),
        }
    }

    fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }

    /// Read an object, returning None if the key doesn't exist.
    pub async fn read_bytes_optional(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| AppError::persistence(&self.uri(key), e))?;
                Ok(Some(bytes.into_bytes().to_vec()))
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    log::info!("No existing data at {}", self.uri(key));
                    Ok(None)
                } else {
                    Err(AppError::persistence(&self.uri(key), service_err))
                }
            }
        }
    }

    /// Write bytes to an object.
    async fn write_bytes(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| AppError::persistence(&self.uri(key), e))?;
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for S3Storage {
    async fn load(&self) -> Result<Option<Snapshot>> {
        let key = self.snapshot_key();
        match self.read_bytes_optional(&key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| AppError::persistence(&self.uri(&key), e)),
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let key = self.snapshot_key();
        let json = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| AppError::persistence(&self.uri(&key), e))?;
        self.write_bytes(&key, json).await?;

        log::info!("Wrote {} notices to {}", snapshot.len(), self.uri(&key));
        Ok(())
    }

    fn location(&self) -> String {
        self.uri(&self.snapshot_key())
    }
}
