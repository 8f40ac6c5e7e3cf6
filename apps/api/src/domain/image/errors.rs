use thiserror::Error;

/// Failures of the upload and delete pipelines.
///
/// The `Display` text of each variant is exactly what the caller sees in the
/// `{ "error": ... }` envelope. Backend failures keep their source for logging
/// but never expose it through `Display`.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("please log in first")]
    Unauthorized,

    #[error("file not found")]
    MissingFile,

    #[error("only image files are supported (jpg, jpeg, png, webp, gif)")]
    UnsupportedType(String),

    #[error("image exceeds 5MB")]
    TooLarge(usize),

    #[error("missing image URL parameter")]
    MissingUrl,

    #[error("upload failed, please retry")]
    UploadFailed(#[source] anyhow::Error),

    #[error("delete failed, please retry")]
    DeleteFailed(#[source] anyhow::Error),
}

impl ImageError {
    /// True for failures the caller caused and can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFile | Self::UnsupportedType(_) | Self::TooLarge(_) | Self::MissingUrl
        )
    }
}
