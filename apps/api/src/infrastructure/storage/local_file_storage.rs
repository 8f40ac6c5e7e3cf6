use super::traits::StorageService;
use crate::domain::image::entity::StoredImage;
use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;

/// URL prefix the uploads directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Stores images in a directory on local disk.
///
/// Writes overwrite silently. Deletes never fail: a missing file is logged
/// and ignored.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    uploads_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    /// Resolve `relative` against the process working directory.
    pub fn in_working_dir(relative: impl AsRef<Path>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
        Ok(Self::new(cwd.join(relative)))
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}

#[async_trait]
impl StorageService for LocalFileStorage {
    /// The content type is not persisted; `/uploads` serving derives it from the extension.
    async fn upload_image(
        &self,
        data: Bytes,
        filename: &str,
        _content_type: &str,
    ) -> anyhow::Result<StoredImage> {
        let size = data.len();

        // create_dir_all succeeds when the directory already exists, so
        // concurrent uploads can all call it.
        fs::create_dir_all(&self.uploads_dir).await.with_context(|| {
            format!(
                "Failed to create uploads directory {}",
                self.uploads_dir.display()
            )
        })?;

        let path = self.uploads_dir.join(filename);
        fs::write(&path, &data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), size_bytes = size, "Local upload stored");

        Ok(StoredImage {
            url: format!("{}/{}", UPLOADS_URL_PREFIX, filename),
            filename: filename.to_string(),
            size,
        })
    }

    async fn delete_image(&self, url: &str) -> anyhow::Result<()> {
        let Some(filename) = url.rsplit('/').next().filter(|s| !s.is_empty()) else {
            return Ok(());
        };

        let path = self.uploads_dir.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Local upload deleted"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete local file")
            }
        }
        Ok(())
    }

    fn image_url(&self, url: &str) -> String {
        if url.starts_with('/') {
            url.to_string()
        } else {
            format!("/{}", url)
        }
    }
}
