//! Role-based authorization guards.
//!
//! These guards extract the authenticated account and verify its role.
//! Pages that serve both roles match on `AccountRole` instead.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedAccount;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for patient-only actions.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequirePatient(account): RequirePatient) { ... }
/// ```
pub struct RequirePatient(pub AuthenticatedAccount);

impl<S> FromRequestParts<S> for RequirePatient
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let account = parts
            .extensions
            .get::<AuthenticatedAccount>()
            .ok_or_else(|| AppError::Unauthorized("Account not authenticated".to_string()))?;

        if !account.is_patient() {
            return Err(AppError::Forbidden(
                "Only patients can request appointments".to_string(),
            ));
        }

        Ok(RequirePatient(account.clone()))
    }
}
