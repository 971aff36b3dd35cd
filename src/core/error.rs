use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use thiserror::Error;

use crate::shared::templates::{render_template, TemplateError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Request too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Message that is safe to show on a page or in a flash
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Storage(_) | AppError::Template(_) => {
                "Internal server error".to_string()
            }
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::DuplicateEmail | AppError::InvalidCredentials => self.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Database(ref e) => tracing::error!("Database error: {:?}", e),
            AppError::Storage(ref e) => tracing::error!("Storage error: {:?}", e),
            AppError::Template(ref e) => tracing::error!("Template error: {}", e),
            AppError::Internal(ref msg) => tracing::error!("Internal error: {}", msg),
            // Protected pages send anonymous visitors to the login form
            AppError::Unauthorized(ref msg) => {
                tracing::debug!("Redirecting unauthenticated request: {}", msg);
                return Redirect::to("/login").into_response();
            }
            _ => {}
        }

        let status = self.status();
        let message = self.user_message();

        let body = render_template(
            "error.html",
            context! {
                status => status.as_u16(),
                reason => status.canonical_reason().unwrap_or("Error"),
                message => &message,
            },
        )
        .unwrap_or_else(|e| {
            tracing::error!("Failed to render error page: {}", e);
            message
        });

        (status, Html(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized("no session".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::DuplicateEmail, StatusCode::CONFLICT),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                AppError::PayloadTooLarge("x".into()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_internal_details_are_not_shown() {
        let error = AppError::Internal("secret path /var/db".to_string());
        assert_eq!(error.user_message(), "Internal server error");
    }
}
