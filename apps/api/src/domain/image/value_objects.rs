use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use super::errors::ImageError;

/// Largest accepted upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types accepted by the upload pipeline.
pub const ALLOWED_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

const DEFAULT_EXTENSION: &str = "jpg";
const SUFFIX_LEN: usize = 8;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A declared MIME type that passed the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContentType(String);

impl ImageContentType {
    pub fn parse(declared: &str) -> Result<Self, ImageError> {
        if ALLOWED_CONTENT_TYPES.contains(&declared) {
            Ok(Self(declared.to_string()))
        } else {
            Err(ImageError::UnsupportedType(declared.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejects payloads over [`MAX_IMAGE_BYTES`].
pub fn ensure_within_size_limit(len: usize) -> Result<(), ImageError> {
    if len > MAX_IMAGE_BYTES {
        return Err(ImageError::TooLarge(len));
    }
    Ok(())
}

/// Storage name of the form `{epoch-millis}-{8 base36 chars}.{extension}`.
///
/// Collisions are improbable, not impossible. Two uploads landing on the same
/// name race and the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneratedFilename(String);

impl GeneratedFilename {
    pub fn new(original_name: Option<&str>) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::with_parts(millis, &random_suffix(), &extension_of(original_name))
    }

    fn with_parts(millis: u128, suffix: &str, extension: &str) -> Self {
        Self(format!("{millis}-{suffix}.{extension}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for GeneratedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extension of the client-supplied name, lowercased.
///
/// Falls back to `jpg` when there is no extension or when it contains anything
/// but ASCII alphanumerics, so a crafted name cannot smuggle path separators
/// into the storage key.
pub fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn random_suffix() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}
