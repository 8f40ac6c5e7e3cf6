pub mod local_file_storage;
pub mod provider;
pub mod r2_storage_service;
pub mod traits;
