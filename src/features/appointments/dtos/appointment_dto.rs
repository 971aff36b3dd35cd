use serde::{Deserialize, Serialize};

use crate::features::accounts::models::Account;
use crate::features::appointments::models::{AppointmentStatus, AppointmentView};

/// Booking form. Fields stay strings so bad input becomes a flash, not a 400.
#[derive(Debug, Deserialize)]
pub struct BookAppointmentFormDto {
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

/// Bookable doctor
#[derive(Debug, Clone, Serialize)]
pub struct DoctorDto {
    pub id: i64,
    pub email: String,
}

impl From<Account> for DoctorDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentResponseDto {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
    /// Doctor's email for a patient, patient's email for a doctor
    pub counterpart_email: String,
}

impl From<AppointmentView> for AppointmentResponseDto {
    fn from(v: AppointmentView) -> Self {
        Self {
            id: v.id,
            date: v.date,
            time: v.time,
            status: v.status,
            counterpart_email: v.counterpart_email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingPageDto {
    pub doctors: Vec<DoctorDto>,
}

#[derive(Debug, Serialize)]
pub struct DoctorAppointmentsPageDto {
    pub appointments: Vec<AppointmentResponseDto>,
}
