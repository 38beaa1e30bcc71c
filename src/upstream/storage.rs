//! Object storage for uploaded images.
//!
//! # Responsibilities
//! - Store decoded image bytes under the caller's file name
//! - Report the public URL of the stored object
//!
//! # Design Decisions
//! - `ObjectStore` is a trait so the route layer never depends on the AWS SDK
//! - Credentials come from the SDK's default chain, never from request input

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use url::Url;

use crate::config::StorageConfig;
use crate::observability::metrics;
use crate::upstream::UpstreamError;

/// An object about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Destination for uploaded images.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `object` and return its public URL.
    async fn put(&self, object: StoredObject) -> Result<String, UpstreamError>;
}

/// S3-backed store.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: Url,
}

impl S3Store {
    /// Connect using the SDK environment plus the configured region/endpoint.
    pub async fn from_config(config: &StorageConfig) -> Result<Self, UpstreamError> {
        let mut sdk_config = aws_config::load_from_env().await;
        let mut builder = sdk_config
            .to_builder()
            .region(aws_config::Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }
        sdk_config = builder.build();

        let client = aws_sdk_s3::Client::new(&sdk_config);
        let public_base = public_base_url(config)?;

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            public_base = %public_base,
            "Object storage configured"
        );

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            public_base,
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(&self, object: StoredObject) -> Result<String, UpstreamError> {
        let size = object.bytes.len();
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object.key)
            .content_type(&object.content_type)
            .body(ByteStream::from(object.bytes))
            .send()
            .await;

        if let Err(e) = result {
            metrics::record_upstream("s3", "error");
            return Err(UpstreamError::Storage(DisplayErrorContext(&e).to_string()));
        }
        metrics::record_upstream("s3", "ok");

        tracing::debug!(bucket = %self.bucket, key = %object.key, size, "Object stored");
        Ok(object_url(&self.public_base, &object.key))
    }
}

/// Base URL objects are served from: explicit override or virtual-hosted S3.
pub fn public_base_url(config: &StorageConfig) -> Result<Url, UpstreamError> {
    let base = match &config.public_base_url {
        Some(base) => base.clone(),
        None => format!("https://{}.s3.{}.amazonaws.com/", config.bucket, config.region),
    };
    Url::parse(&base).map_err(|e| UpstreamError::Storage(format!("invalid public URL '{base}': {e}")))
}

/// Public URL of `key` under `base`, percent-encoding the key as one path segment.
pub fn object_url(base: &Url, key: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(key);
    }
    url.to_string()
}
