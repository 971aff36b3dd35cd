//! Fixtures shared by unit and router tests.

#[cfg(test)]
use crate::core::config::UploadConfig;
#[cfg(test)]
use crate::core::router::{build_router, AppServices};
#[cfg(test)]
use crate::core::session::SessionKeys;
#[cfg(test)]
use crate::features::accounts::models::AccountRole;
#[cfg(test)]
use crate::features::accounts::AccountService;
#[cfg(test)]
use crate::features::records::RecordService;
#[cfg(test)]
use crate::modules::storage::LocalFileStore;
#[cfg(test)]
use axum_extra::extract::cookie::Key;
#[cfg(test)]
use axum_test::{TestResponse, TestServer};
#[cfg(test)]
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
#[cfg(test)]
use std::str::FromStr;
#[cfg(test)]
use std::sync::Arc;

/// Fresh in-memory database with the schema applied.
///
/// A single connection that never expires, since each new in-memory
/// connection would otherwise see an empty database.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::from_str("sqlite::memory:")
                .unwrap()
                .foreign_keys(true),
        )
        .await
        .unwrap();
    crate::core::database::run_migrations(&pool).await.unwrap();
    pool
}

/// Random but valid email address
#[cfg(test)]
pub fn fake_email() -> String {
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    SafeEmail().fake()
}

/// Full application over an in-memory database and a temporary upload dir
#[cfg(test)]
pub struct TestApp {
    pub server: TestServer,
    pub accounts: Arc<AccountService>,
    pub records: Arc<RecordService>,
    pub upload_dir: tempfile::TempDir,
}

#[cfg(test)]
pub async fn test_app(max_file_size: usize) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalFileStore::new(&UploadConfig {
        dir: upload_dir.path().to_path_buf(),
        max_file_size,
    }));

    let services = AppServices::new(test_pool().await, store, max_file_size);
    let accounts = Arc::clone(&services.accounts);
    let records = Arc::clone(&services.records);

    let app = build_router(services, SessionKeys::new(Key::generate(), false));
    let server = TestServer::builder().save_cookies().build(app).unwrap();

    TestApp {
        server,
        accounts,
        records,
        upload_dir,
    }
}

#[cfg(test)]
pub async fn register(
    server: &TestServer,
    email: &str,
    password: &str,
    role: AccountRole,
) -> TestResponse {
    let role = role.to_string();
    server
        .post("/register")
        .form(&[("email", email), ("password", password), ("role", role.as_str())])
        .await
}

/// Log in and keep the session cookie on the server
#[cfg(test)]
pub async fn login(server: &TestServer, email: &str, password: &str) {
    let response = server
        .post("/login")
        .form(&[("email", email), ("password", password)])
        .await;
    response.assert_status(axum::http::StatusCode::SEE_OTHER);
}
