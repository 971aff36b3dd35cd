use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::records::handlers::{serve_upload, upload_page, upload_record};
use crate::features::records::services::RecordService;
use crate::shared::constants::MULTIPART_OVERHEAD;

/// Create routes for the records feature (all require a session)
pub fn routes(record_service: Arc<RecordService>) -> Router {
    let body_limit = record_service.max_file_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/upload",
            // Allow body size up to the file ceiling plus multipart framing
            get(upload_page)
                .post(upload_record)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/uploads/{filename}", get(serve_upload))
        .with_state(record_service)
}
