use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::core::session::Session;
use crate::features::auth::dtos::{LoginFormDto, RegisterFormDto};
use crate::features::auth::services::AuthService;
use crate::shared::constants::{MSG_EMAIL_EXISTS, MSG_INVALID_CREDENTIALS, MSG_REGISTERED};
use crate::shared::types::{render_page, NoData, PageLayout};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

fn validation_message(errors: &ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();

    if messages.is_empty() {
        "Invalid form data".to_string()
    } else {
        messages.join(", ")
    }
}

fn render_login(session: Session, mut messages: Vec<String>, extra: Option<&str>) -> Result<Response> {
    if let Some(message) = extra {
        messages.push(message.to_string());
    }
    let page = render_page("login.html", PageLayout::anonymous(messages), NoData {})?;
    Ok((session, page).into_response())
}

/// Login form
pub async fn login_page(session: Session) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    render_login(session, messages, None)
}

/// Check credentials and bind the session.
///
/// Every failure re-renders the form with the same generic message.
pub async fn login(
    State(service): State<Arc<AuthService>>,
    session: Session,
    AppForm(dto): AppForm<LoginFormDto>,
) -> Result<Response> {
    let (session, messages) = session.take_flashes();

    if dto.validate().is_err() {
        return render_login(session, messages, Some(MSG_INVALID_CREDENTIALS));
    }

    match service.login(dto).await {
        Ok(account) => Ok((session.login(account.id), Redirect::to("/dashboard")).into_response()),
        Err(AppError::InvalidCredentials) => {
            render_login(session, messages, Some(MSG_INVALID_CREDENTIALS))
        }
        Err(e) => Err(e),
    }
}

/// Registration form
pub async fn register_page(session: Session) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    let page = render_page("register.html", PageLayout::anonymous(messages), NoData {})?;
    Ok((session, page).into_response())
}

/// Create an account and send the visitor to the login form
pub async fn register(
    State(service): State<Arc<AuthService>>,
    session: Session,
    AppForm(dto): AppForm<RegisterFormDto>,
) -> Result<Response> {
    if let Err(e) = dto.validate() {
        let message = validation_message(&e);
        return Ok((session.flash(message), Redirect::to("/register")).into_response());
    }

    match service.register(dto).await {
        Ok(_) => Ok((session.flash(MSG_REGISTERED), Redirect::to("/login")).into_response()),
        Err(AppError::DuplicateEmail) => {
            Ok((session.flash(MSG_EMAIL_EXISTS), Redirect::to("/register")).into_response())
        }
        Err(AppError::Validation(message)) => {
            Ok((session.flash(message), Redirect::to("/register")).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Clear the session
pub async fn logout(session: Session) -> impl IntoResponse {
    (session.logout(), Redirect::to("/login"))
}

#[cfg(test)]
mod tests {
    use crate::features::accounts::models::AccountRole;
    use crate::shared::test_helpers::{login, register, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_register_then_login_reaches_dashboard() {
        let app = test_app(1024).await;

        let response = register(&app.server, "ana@example.com", "s3cret", AccountRole::Patient).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        let page = app.server.get("/login").await;
        assert!(page.text().contains("Registration successful! Please log in."));

        login(&app.server, "ana@example.com", "s3cret").await;
        let dashboard = app.server.get("/dashboard").await;
        dashboard.assert_status_ok();
        assert!(dashboard.text().contains("ana@example.com"));
    }

    #[tokio::test]
    async fn test_duplicate_email_creates_no_account() {
        let app = test_app(1024).await;

        register(&app.server, "ana@example.com", "first", AccountRole::Patient).await;
        let response = register(&app.server, "ana@example.com", "second", AccountRole::Admin).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/register");
        assert_eq!(app.accounts.count().await.unwrap(), 1);

        let page = app.server.get("/register").await;
        assert!(page.text().contains("Email already exists"));
    }

    #[tokio::test]
    async fn test_invalid_registration_is_flashed() {
        let app = test_app(1024).await;

        let response = app
            .server
            .post("/register")
            .form(&[("email", "not-an-email"), ("password", "pw"), ("role", "patient")])
            .await;
        assert_eq!(response.header("location"), "/register");

        let response = app
            .server
            .post("/register")
            .form(&[("email", "ana@example.com"), ("password", "pw"), ("role", "nurse")])
            .await;
        assert_eq!(response.header("location"), "/register");

        assert_eq!(app.accounts.count().await.unwrap(), 0);
        let page = app.server.get("/register").await;
        assert!(page.text().contains("Invalid email format"));
    }

    #[tokio::test]
    async fn test_mismatched_credentials_fail_generically() {
        let app = test_app(1024).await;
        register(&app.server, "ana@example.com", "s3cret", AccountRole::Patient).await;

        for (email, password) in [
            ("ana@example.com", "wrong"),
            ("ANA@example.com", "s3cret"),
            ("nobody@example.com", "s3cret"),
            ("", ""),
        ] {
            let response = app
                .server
                .post("/login")
                .form(&[("email", email), ("password", password)])
                .await;
            response.assert_status_ok();
            assert!(response.text().contains("Invalid credentials"));
        }

        let response = app.server.get("/dashboard").await;
        assert_eq!(response.header("location"), "/login");
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = test_app(1024).await;
        register(&app.server, "ana@example.com", "s3cret", AccountRole::Patient).await;
        login(&app.server, "ana@example.com", "s3cret").await;
        app.server.get("/dashboard").await.assert_status_ok();

        let response = app.server.get("/logout").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");

        let response = app.server.get("/dashboard").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login");
    }
}
