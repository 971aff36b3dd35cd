use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::accounts::models::{Account, AccountRole};
use crate::features::accounts::AccountService;
use crate::features::auth::dtos::{LoginFormDto, RegisterFormDto};
use crate::features::auth::services::password::{hash_password, verify_password};

/// Service for authentication operations (register, login)
pub struct AuthService {
    accounts: Arc<AccountService>,
}

impl AuthService {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }

    /// Register a new account
    pub async fn register(&self, dto: RegisterFormDto) -> Result<Account> {
        let role: AccountRole = dto.role.parse().map_err(AppError::Validation)?;

        if self.accounts.find_by_email(&dto.email).await?.is_some() {
            tracing::debug!("Registration rejected, email already exists");
            return Err(AppError::DuplicateEmail);
        }

        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let account = self
            .accounts
            .create(&dto.email, &password_hash, role)
            .await?;

        tracing::info!("Account registered: id={}, role={}", account.id, account.role);

        Ok(account)
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, dto: LoginFormDto) -> Result<Account> {
        let account = self
            .accounts
            .find_by_email(&dto.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = dto.password;
        let stored_hash = account.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {}", e)))?;

        if !valid {
            tracing::debug!("Login rejected for account {}", account.id);
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("Account logged in: id={}", account.id);

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    fn register_dto(email: &str, password: &str, role: &str) -> RegisterFormDto {
        RegisterFormDto {
            email: email.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    fn login_dto(email: &str, password: &str) -> LoginFormDto {
        LoginFormDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn service() -> (AuthService, Arc<AccountService>) {
        let accounts = Arc::new(AccountService::new(test_pool().await));
        (AuthService::new(Arc::clone(&accounts)), accounts)
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, _) = service().await;
        let account = service
            .register(register_dto("ana@example.com", "hunter2", "patient"))
            .await
            .unwrap();

        assert_ne!(account.password_hash, "hunter2");
        assert!(verify_password("hunter2", &account.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, accounts) = service().await;
        service
            .register(register_dto("ana@example.com", "a", "patient"))
            .await
            .unwrap();

        let result = service
            .register(register_dto("ana@example.com", "b", "admin"))
            .await;
        assert!(matches!(result, Err(AppError::DuplicateEmail)));
        assert_eq!(accounts.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_unknown_role() {
        let (service, _) = service().await;
        let result = service
            .register(register_dto("ana@example.com", "a", "doctor"))
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_requires_exact_match() {
        let (service, _) = service().await;
        let registered = service
            .register(register_dto("ana@example.com", "hunter2", "patient"))
            .await
            .unwrap();

        let account = service
            .login(login_dto("ana@example.com", "hunter2"))
            .await
            .unwrap();
        assert_eq!(account.id, registered.id);

        for (email, password) in [
            ("ana@example.com", "wrong"),
            ("other@example.com", "hunter2"),
            ("Ana@example.com", "hunter2"),
        ] {
            let result = service.login(login_dto(email, password)).await;
            assert!(matches!(result, Err(AppError::InvalidCredentials)));
        }
    }
}
