use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::session::Session;
use crate::features::auth::model::AuthenticatedAccount;
use crate::features::dashboard::dtos::DashboardView;
use crate::features::dashboard::services::DashboardService;
use crate::shared::types::{render_page, PageLayout};

pub async fn dashboard(
    account: AuthenticatedAccount,
    session: Session,
    State(service): State<Arc<DashboardService>>,
) -> Result<Response> {
    let view = service.view_for(&account).await?;
    let (session, messages) = session.take_flashes();
    let layout = PageLayout::for_account(&account, messages);

    let page = match view {
        DashboardView::Admin(data) => render_page("admin_dashboard.html", layout, data)?,
        DashboardView::Patient(data) => render_page("user_dashboard.html", layout, data)?,
    };

    Ok((session, page).into_response())
}
