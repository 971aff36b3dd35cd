use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;

/// Account role. Admin accounts are the bookable doctors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Patient,
    Admin,
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Patient => write!(f, "patient"),
            AccountRole::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for AccountRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(AccountRole::Patient),
            "admin" => Ok(AccountRole::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}

/// Database model for account
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}
