use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for an uploaded medical record
#[derive(Debug, Clone, FromRow)]
pub struct Record {
    pub id: i64,
    pub account_id: i64,
    /// Storage key under the upload directory
    pub filename: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}
