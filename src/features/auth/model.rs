use crate::features::accounts::models::{Account, AccountRole};

/// The account behind the current request, loaded fresh by the session gate
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub id: i64,
    pub email: String,
    pub role: AccountRole,
}

impl AuthenticatedAccount {
    /// Check if account is a patient
    pub fn is_patient(&self) -> bool {
        matches!(self.role, AccountRole::Patient)
    }
}

impl From<Account> for AuthenticatedAccount {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
        }
    }
}
