//! Static pages: landing page plus the chatbot and pharmacy placeholders.

pub mod handlers;
pub mod routes;

pub use routes::{protected_routes, public_routes};
