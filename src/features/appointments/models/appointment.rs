use serde::Serialize;
use sqlx::{FromRow, Type};

/// Appointment lifecycle status. New requests are always `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Database model for appointment
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub status: AppointmentStatus,
}

/// Appointment joined with the email of the other party
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentView {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    pub counterpart_email: String,
}
