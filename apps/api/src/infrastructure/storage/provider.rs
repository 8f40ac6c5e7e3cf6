use super::{
    local_file_storage::LocalFileStorage,
    r2_storage_service::{R2Settings, R2StorageService},
    traits::StorageService,
};
use crate::{config::Config, domain::image::entity::StoredImage};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

/// Which backend a process is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Local,
    Remote,
}

impl BackendKind {
    /// Remote storage wins when running on the managed platform or when a
    /// remote access token is configured.
    pub fn select(managed_platform: bool, has_remote_token: bool) -> Self {
        if managed_platform || has_remote_token {
            Self::Remote
        } else {
            Self::Local
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::select(config.managed_platform, config.r2_access_key_id.is_some())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

/// The storage backend bound at startup.
pub enum StorageProvider {
    Local(LocalFileStorage),
    Remote(R2StorageService),
}

impl StorageProvider {
    /// Build the provider chosen by [`BackendKind::from_config`].
    ///
    /// # Errors
    ///
    /// Fails when the remote backend is selected but its settings are incomplete,
    /// or when the working directory cannot be resolved.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = match BackendKind::from_config(config) {
            BackendKind::Remote => Self::Remote(R2StorageService::new(config.r2_settings()?)),
            BackendKind::Local => Self::Local(LocalFileStorage::in_working_dir(&config.uploads_dir)?),
        };
        tracing::info!(backend = provider.kind().as_str(), "Storage backend bound");
        Ok(provider)
    }

    pub fn local(storage: LocalFileStorage) -> Self {
        Self::Local(storage)
    }

    pub fn remote(settings: R2Settings) -> Self {
        Self::Remote(R2StorageService::new(settings))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local(_) => BackendKind::Local,
            Self::Remote(_) => BackendKind::Remote,
        }
    }

    fn backend(&self) -> &dyn StorageService {
        match self {
            Self::Local(storage) => storage,
            Self::Remote(storage) => storage,
        }
    }
}

#[async_trait]
impl StorageService for StorageProvider {
    async fn upload_image(
        &self,
        data: Bytes,
        filename: &str,
        content_type: &str,
    ) -> anyhow::Result<StoredImage> {
        self.backend()
            .upload_image(data, filename, content_type)
            .await
    }

    async fn delete_image(&self, url: &str) -> anyhow::Result<()> {
        self.backend().delete_image(url).await
    }

    fn image_url(&self, url: &str) -> String {
        self.backend().image_url(url)
    }
}
