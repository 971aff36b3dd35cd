use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::records::dtos::{RecordResponseDto, StoredFile};
use crate::features::records::models::Record;
use crate::modules::storage::LocalFileStore;
use crate::shared::constants::MSG_NO_FILE;
use crate::shared::validation::secure_filename;

/// Service for record uploads and retrieval
pub struct RecordService {
    pool: SqlitePool,
    store: Arc<LocalFileStore>,
    max_file_size: usize,
}

impl RecordService {
    pub fn new(pool: SqlitePool, store: Arc<LocalFileStore>, max_file_size: usize) -> Self {
        Self {
            pool,
            store,
            max_file_size,
        }
    }

    /// Per-file size ceiling in bytes
    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Store an uploaded file and record it against the account.
    ///
    /// # Arguments
    /// * `account_id` - The uploading account
    /// * `original_filename` - Filename as submitted by the client
    /// * `content_type` - Declared MIME type, stored as-is
    /// * `data` - File content
    pub async fn upload(
        &self,
        account_id: i64,
        original_filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<RecordResponseDto> {
        if data.len() > self.max_file_size {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large. Maximum size is {} bytes",
                self.max_file_size
            )));
        }

        let safe_name = secure_filename(original_filename);
        if safe_name.is_empty() {
            debug!("Rejected upload with unusable filename {:?}", original_filename);
            return Err(AppError::BadRequest(MSG_NO_FILE.to_string()));
        }

        let key = LocalFileStore::generate_key(&data, &safe_name);
        let file_size = data.len() as i64;

        // Identical content under the same name shares a key with an earlier record
        let already_stored = self.store.exists(&key).await?;
        self.store.save(&key, &data).await?;

        let record = sqlx::query_as::<_, Record>(
            r#"
            INSERT INTO records (account_id, filename, original_filename, content_type, file_size, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, account_id, filename, original_filename, content_type, file_size, created_at
            "#,
        )
        .bind(account_id)
        .bind(&key)
        .bind(original_filename)
        .bind(content_type)
        .bind(file_size)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save record metadata: {:?}", e);
            AppError::Database(e)
        });

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                if !already_stored {
                    if let Err(cleanup) = self.store.remove(&key).await {
                        warn!("Failed to remove orphaned upload {}: {}", key, cleanup);
                    }
                }
                return Err(e);
            }
        };

        info!(
            "Record saved: id={}, account_id={}, key={}, size={}",
            record.id, record.account_id, record.filename, record.file_size
        );

        Ok(record.into())
    }

    /// Records owned by an account, in upload order
    pub async fn list_for_account(&self, account_id: i64) -> Result<Vec<RecordResponseDto>> {
        let records = sqlx::query_as::<_, Record>(
            r#"
            SELECT id, account_id, filename, original_filename, content_type, file_size, created_at
            FROM records
            WHERE account_id = ?
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list records: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    /// Read an uploaded file by its storage name.
    ///
    /// There is no ownership check: any authenticated account may fetch
    /// any stored name.
    pub async fn read_file(&self, filename: &str) -> Result<StoredFile> {
        let data = self
            .store
            .read(filename)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let content_type = mime_guess::from_path(filename)
            .first_or_octet_stream()
            .to_string();

        Ok(StoredFile { data, content_type })
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
