use std::sync::Arc;

use crate::core::error::Result;
use crate::features::accounts::models::AccountRole;
use crate::features::accounts::AccountService;
use crate::features::appointments::AppointmentService;
use crate::features::auth::model::AuthenticatedAccount;
use crate::features::dashboard::dtos::*;
use crate::features::records::RecordService;

/// Assembles the dashboard for the signed-in account
pub struct DashboardService {
    accounts: Arc<AccountService>,
    records: Arc<RecordService>,
    appointments: Arc<AppointmentService>,
}

impl DashboardService {
    pub fn new(
        accounts: Arc<AccountService>,
        records: Arc<RecordService>,
        appointments: Arc<AppointmentService>,
    ) -> Self {
        Self {
            accounts,
            records,
            appointments,
        }
    }

    /// Admins see every patient; patients see their own records and appointments
    pub async fn view_for(&self, account: &AuthenticatedAccount) -> Result<DashboardView> {
        let view = match account.role {
            AccountRole::Admin => {
                let patients = self
                    .accounts
                    .list_by_role(AccountRole::Patient)
                    .await?
                    .into_iter()
                    .map(PatientSummaryDto::from)
                    .collect();
                DashboardView::Admin(AdminDashboardDto { patients })
            }
            AccountRole::Patient => {
                let records = self.records.list_for_account(account.id).await?;
                let appointments = self.appointments.list_for_patient(account.id).await?;
                DashboardView::Patient(PatientDashboardDto {
                    records,
                    appointments,
                })
            }
        };

        Ok(view)
    }
}
