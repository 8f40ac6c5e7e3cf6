use crate::{
    config::Config,
    infrastructure::storage::{
        provider::{BackendKind, StorageProvider},
        traits::StorageService,
    },
};
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    /// The backend bound at startup; shared by every request.
    pub storage: Arc<dyn StorageService>,
    pub backend: BackendKind,
    /// Directory served under `/uploads` when the local backend is bound.
    pub public_uploads_dir: Option<PathBuf>,
    pub config: Config,
}

impl AppState {
    pub fn new(provider: StorageProvider, config: Config) -> Self {
        let public_uploads_dir = match &provider {
            StorageProvider::Local(local) => Some(local.uploads_dir().to_path_buf()),
            StorageProvider::Remote(_) => None,
        };
        Self {
            backend: provider.kind(),
            storage: Arc::new(provider),
            public_uploads_dir,
            config,
        }
    }
}
