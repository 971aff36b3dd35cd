use axum::response::{IntoResponse, Response};

use crate::core::error::Result;
use crate::core::session::Session;
use crate::features::auth::model::AuthenticatedAccount;
use crate::shared::types::{render_page, NoData, PageLayout};

pub async fn home(session: Session) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    let page = render_page("index.html", PageLayout::anonymous(messages), NoData {})?;
    Ok((session, page).into_response())
}

async fn static_page(template: &str, account: AuthenticatedAccount, session: Session) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    let page = render_page(template, PageLayout::for_account(&account, messages), NoData {})?;
    Ok((session, page).into_response())
}

/// Health assistant placeholder
pub async fn chatbot(account: AuthenticatedAccount, session: Session) -> Result<Response> {
    static_page("chatbot.html", account, session).await
}

/// Pharmacy placeholder with a fixed catalogue
pub async fn pharmacy(account: AuthenticatedAccount, session: Session) -> Result<Response> {
    static_page("pharmacy.html", account, session).await
}

#[cfg(test)]
mod tests {
    use crate::features::accounts::models::AccountRole;
    use crate::shared::test_helpers::{login, register, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_home_is_public() {
        let app = test_app(1024).await;
        let page = app.server.get("/").await;
        page.assert_status_ok();
        assert!(page.text().contains("MediVault"));
    }

    #[tokio::test]
    async fn test_placeholders_require_session() {
        let app = test_app(1024).await;
        for path in ["/chatbot", "/pharmacy"] {
            let response = app.server.get(path).await;
            response.assert_status(StatusCode::SEE_OTHER);
            assert_eq!(response.header("location"), "/login");
        }

        register(&app.server, "pat@example.com", "pw", AccountRole::Patient).await;
        login(&app.server, "pat@example.com", "pw").await;

        assert!(app.server.get("/chatbot").await.text().contains("Health Assistant"));
        assert!(app.server.get("/pharmacy").await.text().contains("Paracetamol"));
    }
}
