use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::core::session::Session;
use crate::features::accounts::models::AccountRole;
use crate::features::appointments::dtos::{
    BookAppointmentFormDto, BookingPageDto, DoctorAppointmentsPageDto,
};
use crate::features::appointments::services::AppointmentService;
use crate::features::auth::guards::RequirePatient;
use crate::features::auth::model::AuthenticatedAccount;
use crate::shared::constants::MSG_APPOINTMENT_REQUESTED;
use crate::shared::types::{render_page, PageLayout};

/// Booking form for patients, appointment list for doctors
pub async fn appointment_page(
    account: AuthenticatedAccount,
    session: Session,
    State(service): State<Arc<AppointmentService>>,
) -> Result<Response> {
    let (session, messages) = session.take_flashes();
    let layout = PageLayout::for_account(&account, messages);

    let page = match account.role {
        AccountRole::Patient => {
            let doctors = service.list_doctors().await?;
            render_page("appointment.html", layout, BookingPageDto { doctors })?
        }
        AccountRole::Admin => {
            let appointments = service.list_for_doctor(account.id).await?;
            render_page(
                "doctor_appointments.html",
                layout,
                DoctorAppointmentsPageDto { appointments },
            )?
        }
    };

    Ok((session, page).into_response())
}

/// Request an appointment (patients only)
pub async fn book_appointment(
    RequirePatient(account): RequirePatient,
    session: Session,
    State(service): State<Arc<AppointmentService>>,
    AppForm(dto): AppForm<BookAppointmentFormDto>,
) -> Result<Response> {
    match service.book(account.id, dto).await {
        Ok(_) => Ok((
            session.flash(MSG_APPOINTMENT_REQUESTED),
            Redirect::to("/dashboard"),
        )
            .into_response()),
        Err(AppError::Validation(message)) => {
            Ok((session.flash(message), Redirect::to("/appointment")).into_response())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use crate::features::accounts::models::AccountRole;
    use crate::shared::test_helpers::{login, register, test_app};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_booking_shows_only_for_chosen_doctor() {
        let app = test_app(1024).await;
        register(&app.server, "doc@example.com", "pw", AccountRole::Admin).await;
        register(&app.server, "doc2@example.com", "pw", AccountRole::Admin).await;
        register(&app.server, "pat@example.com", "pw", AccountRole::Patient).await;

        let doctor = app.accounts.find_by_email("doc@example.com").await.unwrap().unwrap();

        login(&app.server, "pat@example.com", "pw").await;
        let page = app.server.get("/appointment").await;
        page.assert_status_ok();
        assert!(page.text().contains("doc2@example.com"));

        let response = app
            .server
            .post("/appointment")
            .form(&[
                ("doctor_id", doctor.id.to_string().as_str()),
                ("date", "2025-05-20"),
                ("time", "14:30"),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/dashboard");

        let dashboard = app.server.get("/dashboard").await.text();
        assert!(dashboard.contains("Appointment requested!"));
        assert!(dashboard.contains("pending"));

        app.server.get("/logout").await;
        login(&app.server, "doc@example.com", "pw").await;
        let list = app.server.get("/appointment").await.text();
        assert!(list.contains("pat@example.com"));
        assert!(list.contains("2025-05-20"));

        app.server.get("/logout").await;
        login(&app.server, "doc2@example.com", "pw").await;
        let list = app.server.get("/appointment").await.text();
        assert!(!list.contains("pat@example.com"));
    }

    #[tokio::test]
    async fn test_admin_cannot_book() {
        let app = test_app(1024).await;
        register(&app.server, "doc@example.com", "pw", AccountRole::Admin).await;
        login(&app.server, "doc@example.com", "pw").await;

        let response = app
            .server
            .post("/appointment")
            .form(&[("doctor_id", "1"), ("date", "2025-05-20"), ("time", "14:30")])
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bad_date_is_flashed_back() {
        let app = test_app(1024).await;
        register(&app.server, "doc@example.com", "pw", AccountRole::Admin).await;
        register(&app.server, "pat@example.com", "pw", AccountRole::Patient).await;
        login(&app.server, "pat@example.com", "pw").await;

        let response = app
            .server
            .post("/appointment")
            .form(&[("doctor_id", "1"), ("date", "20/05/2025"), ("time", "14:30")])
            .await;
        assert_eq!(response.header("location"), "/appointment");

        let page = app.server.get("/appointment").await.text();
        assert!(page.contains("Date must be in YYYY-MM-DD format"));
    }
}
