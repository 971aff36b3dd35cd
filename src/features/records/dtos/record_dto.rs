use serde::Serialize;

use crate::features::records::models::Record;

/// Record as shown on the patient dashboard
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponseDto {
    pub id: i64,
    /// Storage key, also the name under `/uploads/`
    pub filename: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: String,
}

impl From<Record> for RecordResponseDto {
    fn from(r: Record) -> Self {
        Self {
            id: r.id,
            filename: r.filename,
            original_filename: r.original_filename,
            content_type: r.content_type,
            file_size: r.file_size,
            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Upload form page data
#[derive(Debug, Serialize)]
pub struct UploadPageDto {
    /// Human-readable size ceiling, e.g. "16 MB"
    pub max_file_size: String,
}

impl UploadPageDto {
    pub fn new(max_file_size: usize) -> Self {
        Self {
            max_file_size: format_size(max_file_size),
        }
    }
}

/// Whole MB or KB when the size divides evenly, bytes otherwise
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB && bytes % MB == 0 {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// A file read back from storage
#[derive(Debug)]
pub struct StoredFile {
    pub data: Vec<u8>,
    pub content_type: String,
}
