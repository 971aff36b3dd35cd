use serde::Serialize;

use crate::features::accounts::models::Account;
use crate::features::appointments::dtos::AppointmentResponseDto;
use crate::features::records::dtos::RecordResponseDto;

/// Patient row on the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummaryDto {
    pub id: i64,
    pub email: String,
    pub created_at: String,
}

impl From<Account> for PatientSummaryDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            created_at: account.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardDto {
    pub patients: Vec<PatientSummaryDto>,
}

#[derive(Debug, Serialize)]
pub struct PatientDashboardDto {
    pub records: Vec<RecordResponseDto>,
    pub appointments: Vec<AppointmentResponseDto>,
}

/// Role-specific dashboard content
#[derive(Debug)]
pub enum DashboardView {
    Admin(AdminDashboardDto),
    Patient(PatientDashboardDto),
}
