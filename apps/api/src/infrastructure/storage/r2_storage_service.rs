use super::traits::StorageService;
use crate::domain::image::entity::StoredImage;
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{BehaviorVersion, Credentials, Region, retry::RetryConfig},
    primitives::ByteStream,
};
use bytes::Bytes;

/// Connection settings for an S3-compatible bucket with a public CDN in front.
#[derive(Debug, Clone)]
pub struct R2Settings {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: String,
    pub region: String,
    pub force_path_style: bool,
    pub bucket: String,
    pub public_url: String,
}

/// Remote blob storage on Cloudflare R2 (or any S3-compatible service).
///
/// Every failure propagates to the caller, including deletes of objects
/// that do not exist.
pub struct R2StorageService {
    client: Client,
    bucket: String,
    public_url: String,
}

impl R2StorageService {
    pub fn new(settings: R2Settings) -> Self {
        let creds = Credentials::new(
            settings.access_key_id,
            settings.secret_access_key,
            None,
            None,
            "r2",
        );
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(creds)
            .endpoint_url(settings.endpoint)
            .region(Region::new(settings.region))
            .force_path_style(settings.force_path_style)
            .retry_config(RetryConfig::disabled())
            .build();
        Self {
            client: Client::from_conf(config),
            bucket: settings.bucket,
            public_url: settings.public_url.trim_end_matches('/').to_string(),
        }
    }

    fn key_for_url<'a>(&self, url: &'a str) -> anyhow::Result<&'a str> {
        url.strip_prefix(&self.public_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!("URL {} is not served from {}", url, self.public_url))
    }
}

#[async_trait]
impl StorageService for R2StorageService {
    async fn upload_image(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> anyhow::Result<StoredImage> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(filename)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .cache_control("public, max-age=31536000, immutable")
            .send()
            .await
            .with_context(|| format!("Failed to put object {}", filename))?;

        tracing::info!(key = %filename, size_bytes = size, "Remote upload stored");

        Ok(StoredImage {
            url: format!("{}/{}", self.public_url, filename),
            filename: filename.to_string(),
            size,
        })
    }

    async fn delete_image(&self, url: &str) -> anyhow::Result<()> {
        let key = self.key_for_url(url)?;

        // delete_object succeeds for absent keys; check first so a missing
        // object surfaces as an error.
        self.client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Object {} not found", key))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Failed to delete object {}", key))?;

        tracing::info!(key = %key, "Remote upload deleted");
        Ok(())
    }

    fn image_url(&self, url: &str) -> String {
        url.to_string()
    }
}
