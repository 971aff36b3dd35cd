use crate::core::error::AppError;
use crate::core::session::Session;
use crate::features::accounts::AccountService;
use crate::features::auth::model::AuthenticatedAccount;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

/// Session gate for protected routes.
///
/// Resolves the session's account id against storage on every request, so
/// role changes and deleted accounts take effect immediately.
pub async fn session_middleware(
    State(accounts): State<Arc<AccountService>>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let account_id = session
        .account_id()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let account = accounts.find_by_id(account_id).await?.ok_or_else(|| {
        tracing::warn!("Session references missing account {}", account_id);
        AppError::Unauthorized("Session account no longer exists".to_string())
    })?;

    req.extensions_mut()
        .insert(AuthenticatedAccount::from(account));
    Ok(next.run(req).await)
}
