use axum::{routing::get, Router};

use crate::features::pages::handlers;

/// Pages anyone can see
pub fn public_routes() -> Router {
    Router::new().route("/", get(handlers::home))
}

/// Pages behind the session gate
pub fn protected_routes() -> Router {
    Router::new()
        .route("/chatbot", get(handlers::chatbot))
        .route("/pharmacy", get(handlers::pharmacy))
}
