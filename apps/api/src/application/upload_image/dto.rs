use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

/// An inbound file, as extracted from the `file` multipart field.
#[derive(Debug, Clone)]
pub struct UploadImageRequest {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UploadImageResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
}
