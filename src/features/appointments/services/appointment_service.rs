use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::accounts::models::AccountRole;
use crate::features::accounts::AccountService;
use crate::features::appointments::dtos::{
    AppointmentResponseDto, BookAppointmentFormDto, DoctorDto,
};
use crate::features::appointments::models::{Appointment, AppointmentStatus, AppointmentView};

/// Service for appointment booking and listing
pub struct AppointmentService {
    pool: SqlitePool,
    accounts: Arc<AccountService>,
}

fn parse_date(raw: &str) -> Result<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| AppError::Validation("Date must be in YYYY-MM-DD format".to_string()))
}

fn parse_time(raw: &str) -> Result<String> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::Validation("Time must be in HH:MM format".to_string()))
}

impl AppointmentService {
    pub fn new(pool: SqlitePool, accounts: Arc<AccountService>) -> Self {
        Self { pool, accounts }
    }

    /// Admin accounts, which are the bookable doctors
    pub async fn list_doctors(&self) -> Result<Vec<DoctorDto>> {
        let doctors = self.accounts.list_by_role(AccountRole::Admin).await?;
        Ok(doctors.into_iter().map(DoctorDto::from).collect())
    }

    /// Request an appointment with a doctor.
    ///
    /// The doctor must be an existing admin account. Times are stored as `HH:MM`.
    pub async fn book(&self, patient_id: i64, dto: BookAppointmentFormDto) -> Result<Appointment> {
        let doctor_id: i64 = dto
            .doctor_id
            .trim()
            .parse()
            .map_err(|_| AppError::Validation("Please choose a doctor".to_string()))?;
        let date = parse_date(&dto.date)?;
        let time = parse_time(&dto.time)?;

        match self.accounts.find_by_id(doctor_id).await? {
            Some(doctor) if doctor.role == AccountRole::Admin => {}
            _ => {
                return Err(AppError::Validation(
                    "Selected doctor does not exist".to_string(),
                ))
            }
        }

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (patient_id, doctor_id, date, time, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, patient_id, doctor_id, date, time, status
            "#,
        )
        .bind(patient_id)
        .bind(doctor_id)
        .bind(&date)
        .bind(&time)
        .bind(AppointmentStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create appointment: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Appointment requested: id={}, patient_id={}, doctor_id={}, at {} {} ({})",
            appointment.id,
            appointment.patient_id,
            appointment.doctor_id,
            appointment.date,
            appointment.time,
            appointment.status
        );

        Ok(appointment)
    }

    /// A patient's appointments, with the doctor's email
    pub async fn list_for_patient(&self, patient_id: i64) -> Result<Vec<AppointmentResponseDto>> {
        let rows = sqlx::query_as::<_, AppointmentView>(
            r#"
            SELECT ap.id, ap.date, ap.time, ap.status, a.email AS counterpart_email
            FROM appointments ap
            JOIN accounts a ON a.id = ap.doctor_id
            WHERE ap.patient_id = ?
            ORDER BY ap.id
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list patient appointments: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// A doctor's appointments, with the patient's email
    pub async fn list_for_doctor(&self, doctor_id: i64) -> Result<Vec<AppointmentResponseDto>> {
        let rows = sqlx::query_as::<_, AppointmentView>(
            r#"
            SELECT ap.id, ap.date, ap.time, ap.status, a.email AS counterpart_email
            FROM appointments ap
            JOIN accounts a ON a.id = ap.patient_id
            WHERE ap.doctor_id = ?
            ORDER BY ap.id
            "#,
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list doctor appointments: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    struct Fixture {
        service: AppointmentService,
        patient: i64,
        doctor: i64,
        other_doctor: i64,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let accounts = Arc::new(AccountService::new(pool.clone()));
        let patient = accounts
            .create("pat@example.com", "h", AccountRole::Patient)
            .await
            .unwrap();
        let doctor = accounts
            .create("doc@example.com", "h", AccountRole::Admin)
            .await
            .unwrap();
        let other_doctor = accounts
            .create("doc2@example.com", "h", AccountRole::Admin)
            .await
            .unwrap();

        Fixture {
            service: AppointmentService::new(pool, accounts),
            patient: patient.id,
            doctor: doctor.id,
            other_doctor: other_doctor.id,
        }
    }

    fn form(doctor_id: i64, date: &str, time: &str) -> BookAppointmentFormDto {
        BookAppointmentFormDto {
            doctor_id: doctor_id.to_string(),
            date: date.to_string(),
            time: time.to_string(),
        }
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        assert_eq!(parse_time("09:30").unwrap(), "09:30");
        assert_eq!(parse_time("09:30:15").unwrap(), "09:30");
        assert!(parse_time("9.30am").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[tokio::test]
    async fn test_book_creates_pending_appointment() {
        let f = fixture().await;
        let appointment = f
            .service
            .book(f.patient, form(f.doctor, "2025-03-01", "10:15"))
            .await
            .unwrap();

        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(appointment.patient_id, f.patient);
        assert_eq!(appointment.doctor_id, f.doctor);

        let mine = f.service.list_for_doctor(f.doctor).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].counterpart_email, "pat@example.com");
        assert!(f.service.list_for_doctor(f.other_doctor).await.unwrap().is_empty());

        let patient_view = f.service.list_for_patient(f.patient).await.unwrap();
        assert_eq!(patient_view[0].counterpart_email, "doc@example.com");
    }

    #[tokio::test]
    async fn test_book_rejects_non_doctor() {
        let f = fixture().await;
        let result = f
            .service
            .book(f.patient, form(f.patient, "2025-03-01", "10:15"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = f.service.book(f.patient, form(999, "2025-03-01", "10:15")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(f.service.list_for_patient(f.patient).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_doctors_only_admins() {
        let f = fixture().await;
        let doctors = f.service.list_doctors().await.unwrap();
        let emails: Vec<_> = doctors.iter().map(|d| d.email.as_str()).collect();
        assert_eq!(emails, vec!["doc@example.com", "doc2@example.com"]);
    }
}
