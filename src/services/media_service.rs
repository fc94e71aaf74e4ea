//! Generated-media storage.
//!
//! Generated PNGs are written to an S3-compatible bucket and referenced
//! by public URL; the creation row stores only the URL.

use async_trait::async_trait;
use bytes::Bytes;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Media storage seam
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store a PNG and return its public URL
    async fn store_png(&self, data: Bytes) -> Result<String>;
}

/// S3-compatible media bucket with a public read URL
pub struct S3MediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3MediaStore {
    /// Create a new media store.
    ///
    /// Credentials come from the default chain (env vars, profile,
    /// instance metadata). A custom endpoint switches the bucket to
    /// path-style access for MinIO compatibility.
    pub fn new(
        bucket_name: &str,
        region: &str,
        endpoint: Option<&str>,
        public_base_url: &str,
    ) -> Result<Self> {
        let credentials = Credentials::default().map_err(|e| {
            AppError::Config(format!("Failed to load object store credentials: {}", e))
        })?;

        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_string(),
                endpoint: endpoint.to_string(),
            },
            None => region
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid media region: {}", region)))?,
        };

        let use_path_style = endpoint.is_some();

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| AppError::Config(format!("Failed to open media bucket: {}", e)))?;
        let bucket = if use_path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn store_png(&self, data: Bytes) -> Result<String> {
        let key = format!("creations/{}.png", Uuid::new_v4());

        let response = self
            .bucket
            .put_object_with_content_type(&key, &data, "image/png")
            .await
            .map_err(|e| AppError::Storage(format!("Media upload failed: {}", e)))?;

        if response.status_code() != 200 {
            return Err(AppError::Storage(format!(
                "Media upload returned status {}",
                response.status_code()
            )));
        }

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
