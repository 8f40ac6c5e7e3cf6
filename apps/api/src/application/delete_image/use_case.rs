use crate::{
    application::delete_image::dto::DeleteImageResponse,
    domain::image::errors::ImageError,
    infrastructure::storage::traits::StorageService,
};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Removes a previously uploaded image from the bound backend.
pub struct DeleteImageUseCase {
    storage: Arc<dyn StorageService>,
}

impl DeleteImageUseCase {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, url: Option<&str>) -> Result<DeleteImageResponse, ImageError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ImageError::MissingUrl)?;

        self.storage.delete_image(url).await.map_err(|e| {
            error!(url = %url, error = ?e, "Image delete failed");
            ImageError::DeleteFailed(e)
        })?;

        info!(url = %url, "Image deleted");
        Ok(DeleteImageResponse { success: true })
    }
}
