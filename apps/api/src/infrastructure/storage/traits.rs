use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::image::entity::StoredImage;

/// Capability set every storage backend provides.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Store `data` under `filename`. Errors are terminal for the upload; no retries.
    async fn upload_image(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> anyhow::Result<StoredImage>;

    /// Remove an object previously returned by [`StorageService::upload_image`].
    async fn delete_image(&self, url: &str) -> anyhow::Result<()>;

    /// Normalise a stored locator into a servable URL. Idempotent.
    fn image_url(&self, url: &str) -> String;
}
