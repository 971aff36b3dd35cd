//! Local filesystem storage for uploaded records
//!
//! Files are written to a temporary sibling first and renamed into place,
//! so a reader never sees a partially written upload.

use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::config::UploadConfig;
use crate::core::error::AppError;
use crate::shared::constants::STORAGE_KEY_HASH_LEN;
use crate::shared::validation::is_secure_filename;

/// Upload directory on local disk
pub struct LocalFileStore {
    dir: PathBuf,
}

impl LocalFileStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
        }
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_dir_exists(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).await?;
        info!("Upload directory ready: {}", self.dir.display());
        Ok(())
    }

    /// Storage key for `data` uploaded under an already-sanitised name.
    ///
    /// Format: `{first 16 hex digits of sha256(data)}_{safe_name}`. Different
    /// content under the same name never collides; identical content under
    /// the same name maps to the same key.
    pub fn generate_key(data: &[u8], safe_name: &str) -> String {
        let digest = hex::encode(Sha256::digest(data));
        format!("{}_{}", &digest[..STORAGE_KEY_HASH_LEN], safe_name)
    }

    /// Write `data` under `key`
    pub async fn save(&self, key: &str, data: &[u8]) -> Result<(), AppError> {
        if !is_secure_filename(key) {
            return Err(AppError::BadRequest(format!("Invalid storage key '{}'", key)));
        }

        let final_path = self.dir.join(key);
        let temp_path = self.dir.join(format!(".{}.{}.part", key, Uuid::new_v4()));

        fs::write(&temp_path, data).await?;
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!("Stored upload: {} ({} bytes)", final_path.display(), data.len());
        Ok(())
    }

    /// Whether a file is already stored under `key`
    pub async fn exists(&self, key: &str) -> Result<bool, AppError> {
        if !is_secure_filename(key) {
            return Ok(false);
        }
        Ok(fs::try_exists(self.dir.join(key)).await?)
    }

    /// Delete a stored file; a missing file is not an error
    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        if !is_secure_filename(key) {
            return Err(AppError::BadRequest(format!("Invalid storage key '{}'", key)));
        }

        match fs::remove_file(self.dir.join(key)).await {
            Ok(()) => {
                debug!("Removed upload: {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a stored file by name.
    ///
    /// Returns `None` for missing files and for names that are not in
    /// sanitised form, which rules out traversal outside the directory.
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        if !is_secure_filename(name) {
            debug!("Rejected unsafe upload name: {:?}", name);
            return Ok(None);
        }

        match fs::read(self.dir.join(name)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
