use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Public auth routes (no session required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register),
        )
        .with_state(service)
}

/// Protected auth routes (require a session)
pub fn protected_routes() -> Router {
    Router::new().route("/logout", get(handlers::logout))
}
