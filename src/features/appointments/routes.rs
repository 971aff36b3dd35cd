use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::appointments::handlers::{appointment_page, book_appointment};
use crate::features::appointments::services::AppointmentService;

/// Create routes for the appointments feature (all require a session)
pub fn routes(service: Arc<AppointmentService>) -> Router {
    Router::new()
        .route("/appointment", get(appointment_page).post(book_appointment))
        .with_state(service)
}
