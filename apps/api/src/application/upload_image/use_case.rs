use crate::{
    application::upload_image::dto::{UploadImageRequest, UploadImageResponse},
    domain::image::{
        errors::ImageError,
        value_objects::{GeneratedFilename, ImageContentType, ensure_within_size_limit},
    },
    infrastructure::storage::traits::StorageService,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Validates an inbound image, names it and hands it to the bound backend.
///
/// Validation runs before any storage call, so a rejected file never reaches
/// the backend. Backend failures are logged here with their full chain and
/// collapse into [`ImageError::UploadFailed`].
pub struct UploadImageUseCase {
    storage: Arc<dyn StorageService>,
}

impl UploadImageUseCase {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }

    #[instrument(skip(self, request), fields(
        content_type = request.content_type.as_deref().unwrap_or(""),
        size = request.data.len()
    ))]
    pub async fn execute(
        &self,
        request: UploadImageRequest,
    ) -> Result<UploadImageResponse, ImageError> {
        let content_type =
            ImageContentType::parse(request.content_type.as_deref().unwrap_or_default())?;
        ensure_within_size_limit(request.data.len())?;

        let filename = GeneratedFilename::new(request.original_name.as_deref());

        let stored = self
            .storage
            .upload_image(request.data, filename.as_str(), content_type.as_str())
            .await
            .map_err(|e| {
                error!(filename = %filename, error = ?e, "Image upload failed");
                ImageError::UploadFailed(e)
            })?;

        info!(filename = %stored.filename, size = stored.size, "Image uploaded");

        Ok(UploadImageResponse {
            url: self.storage.image_url(&stored.url),
            filename: stored.filename,
            size: stored.size,
            uploaded_at: Utc::now(),
        })
    }
}
