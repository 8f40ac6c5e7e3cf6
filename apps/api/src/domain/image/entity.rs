/// An object as persisted by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Fetchable locator: absolute for remote storage, root-relative for local.
    pub url: String,
    /// The backend's canonical identifier for the object.
    pub filename: String,
    /// Number of bytes actually written.
    pub size: usize,
}
