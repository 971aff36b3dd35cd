use axum::{Extension, Router};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::middleware;
use crate::core::session::SessionKeys;
use crate::features::accounts::AccountService;
use crate::features::appointments::{routes as appointments_routes, AppointmentService};
use crate::features::auth::routes as auth_routes;
use crate::features::auth::AuthService;
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::pages;
use crate::features::records::{routes as records_routes, RecordService};
use crate::modules::storage::LocalFileStore;

/// Every service the router hands out as handler state
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<AccountService>,
    pub auth: Arc<AuthService>,
    pub records: Arc<RecordService>,
    pub appointments: Arc<AppointmentService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, store: Arc<LocalFileStore>, max_file_size: usize) -> Self {
        let accounts = Arc::new(AccountService::new(pool.clone()));
        tracing::info!("Account service initialized");

        let auth = Arc::new(AuthService::new(Arc::clone(&accounts)));
        tracing::info!("Auth service initialized");

        let records = Arc::new(RecordService::new(pool.clone(), store, max_file_size));
        tracing::info!("Record service initialized (max file size: {} bytes)", max_file_size);

        let appointments = Arc::new(AppointmentService::new(pool, Arc::clone(&accounts)));
        tracing::info!("Appointment service initialized");

        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&accounts),
            Arc::clone(&records),
            Arc::clone(&appointments),
        ));
        tracing::info!("Dashboard service initialized");

        Self {
            accounts,
            auth,
            records,
            appointments,
            dashboard,
        }
    }
}

async fn health_check() -> axum::http::StatusCode {
    axum::http::StatusCode::OK
}

/// Assemble the application router
pub fn build_router(services: AppServices, session_keys: SessionKeys) -> Router {
    // Protected routes (require a session bound to an existing account)
    let protected_routes = Router::new()
        .merge(dashboard_routes::routes(Arc::clone(&services.dashboard)))
        .merge(records_routes::routes(Arc::clone(&services.records)))
        .merge(appointments_routes::routes(Arc::clone(&services.appointments)))
        .merge(pages::protected_routes())
        .merge(auth_routes::protected_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.accounts),
            middleware::session_middleware,
        ));

    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no session required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(Arc::clone(&services.auth)))
        .merge(pages::public_routes());

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(Extension(session_keys))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use crate::features::accounts::models::AccountRole;
    use crate::shared::test_helpers::{login, register, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(1024).await;
        let response = app.server.get("/health").await;
        response.assert_status_ok();
        assert!(response.maybe_header("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_to_login() {
        let app = test_app(1024).await;

        for path in [
            "/dashboard",
            "/upload",
            "/appointment",
            "/uploads/anything.txt",
            "/chatbot",
            "/pharmacy",
            "/logout",
        ] {
            let response = app.server.get(path).await;
            response.assert_status(StatusCode::SEE_OTHER);
            assert_eq!(response.header("location"), "/login", "path {}", path);
        }
    }

    #[tokio::test]
    async fn test_forged_session_cookie_is_ignored() {
        let app = test_app(1024).await;
        let response = app
            .server
            .get("/dashboard")
            .add_cookie(axum_extra::extract::cookie::Cookie::new("medivault_session", "1"))
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_session_for_deleted_account_is_unauthenticated() {
        let app = test_app(1024).await;
        register(&app.server, "gone@example.com", "pw", AccountRole::Patient).await;
        login(&app.server, "gone@example.com", "pw").await;
        app.server.get("/dashboard").await.assert_status_ok();

        let account = app
            .accounts
            .find_by_email("gone@example.com")
            .await
            .unwrap()
            .unwrap();
        app.accounts.delete(account.id).await.unwrap();

        let response = app.server.get("/dashboard").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }
}
