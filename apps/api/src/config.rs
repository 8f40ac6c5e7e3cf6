//! Application configuration loading from environment variables.
//!
//! All configuration is read once at startup via `std::env::var`, after `.env`
//! has been loaded by `dotenvy`.
//!
//! # Environment Variables
//!
//! ## Storage selection
//! - `MANAGED_PLATFORM`: set (to any non-empty value) when running on the managed host
//! - `R2_ACCESS_KEY_ID`: remote storage access key; its presence also selects remote storage
//!
//! When either is set, the remaining R2 variables become required:
//! - `R2_SECRET_ACCESS_KEY`, `R2_ENDPOINT`, `R2_BUCKET_NAME`, `R2_PUBLIC_URL`
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,upload_api=debug,tower_http=debug")
//! - `HOST`: Server bind address (default: "0.0.0.0")
//! - `PORT`: Server port (default: 3000)
//! - `SESSION_COOKIE_NAME`: Cookie whose presence marks a logged-in user (default: "app_session")
//! - `UPLOADS_DIR`: Local uploads directory, relative to the working directory (default: "public/uploads")
//! - `MAX_REQUEST_BODY_BYTES`: Request body cap (default: 20 MiB)
//! - `R2_REGION`: AWS region (default: "auto")
//! - `R2_FORCE_PATH_STYLE`: Use path-style URLs (default: false)
//! - `CORS_ALLOWED_ORIGINS`: Comma-separated origins allowed in release builds (default: none)

use crate::infrastructure::storage::r2_storage_service::R2Settings;
use serde::Deserialize;
use std::path::PathBuf;

/// Complete server configuration loaded from environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Name of the session cookie checked by the authentication gate
    pub session_cookie_name: String,

    /// Local uploads directory, relative to the process working directory
    pub uploads_dir: PathBuf,

    /// Upper bound on request bodies. Must exceed the 5 MiB image limit so that
    /// oversized images reach validation instead of being cut off by the framework.
    pub max_request_body_bytes: usize,

    /// Platform-identity signal: true when deployed on the managed host
    pub managed_platform: bool,

    /// Cloudflare R2 access key ID
    pub r2_access_key_id: Option<String>,

    /// Cloudflare R2 secret access key
    pub r2_secret_access_key: Option<String>,

    /// Cloudflare R2 API endpoint (e.g., `https://xxx.r2.cloudflarestorage.com`)
    pub r2_endpoint: Option<String>,

    /// AWS region for R2 (typically "auto")
    pub r2_region: String,

    /// Use path-style URLs instead of virtual-hosted-style
    pub r2_force_path_style: bool,

    /// Bucket images are stored in
    pub r2_bucket_name: Option<String>,

    /// Public URL objects are served from (e.g., `https://cdn.example.com`)
    pub r2_public_url: Option<String>,

    /// Origins allowed to call the API from a browser in release builds
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env_or("HOST", "0.0.0.0".to_string())?,
            port: env_or("PORT", 3000)?,
            session_cookie_name: env_or("SESSION_COOKIE_NAME", "app_session".to_string())?,
            uploads_dir: env_or("UPLOADS_DIR", PathBuf::from("public/uploads"))?,
            max_request_body_bytes: env_or("MAX_REQUEST_BODY_BYTES", 20 * 1024 * 1024)?,
            managed_platform: env_flag("MANAGED_PLATFORM"),
            r2_access_key_id: env_optional("R2_ACCESS_KEY_ID"),
            r2_secret_access_key: env_optional("R2_SECRET_ACCESS_KEY"),
            r2_endpoint: env_optional("R2_ENDPOINT"),
            r2_region: env_or("R2_REGION", "auto".to_string())?,
            r2_force_path_style: env_or("R2_FORCE_PATH_STYLE", false)?,
            r2_bucket_name: env_optional("R2_BUCKET_NAME"),
            r2_public_url: env_optional("R2_PUBLIC_URL"),
            cors_allowed_origins: env_list("CORS_ALLOWED_ORIGINS"),
        })
    }

    /// Collect the R2 settings needed by the remote backend.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing variable.
    pub fn r2_settings(&self) -> anyhow::Result<R2Settings> {
        Ok(R2Settings {
            access_key_id: required(&self.r2_access_key_id, "R2_ACCESS_KEY_ID")?,
            secret_access_key: required(&self.r2_secret_access_key, "R2_SECRET_ACCESS_KEY")?,
            endpoint: required(&self.r2_endpoint, "R2_ENDPOINT")?,
            region: self.r2_region.clone(),
            force_path_style: self.r2_force_path_style,
            bucket: required(&self.r2_bucket_name, "R2_BUCKET_NAME")?,
            public_url: required(&self.r2_public_url, "R2_PUBLIC_URL")?,
        })
    }
}

fn required(value: &Option<String>, key: &str) -> anyhow::Result<String> {
    value
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an environment variable, treating empty values as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Comma-separated list; blank entries are dropped.
fn env_list(key: &str) -> Vec<String> {
    split_list(&std::env::var(key).unwrap_or_default())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Presence-style flag: any non-empty value counts as set.
fn env_flag(key: &str) -> bool {
    is_flag_set(std::env::var(key).ok().as_deref())
}

fn is_flag_set(raw: Option<&str>) -> bool {
    raw.is_some_and(|v| !v.trim().is_empty())
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
