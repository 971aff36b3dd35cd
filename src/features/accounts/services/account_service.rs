use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::accounts::models::{Account, AccountRole};

/// Service for account storage
pub struct AccountService {
    pool: SqlitePool,
}

impl AccountService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account.
    ///
    /// A concurrent registration that wins the race on the same email
    /// surfaces here as a unique violation and maps to `DuplicateEmail`.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: AccountRole,
    ) -> Result<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::DuplicateEmail,
            other => {
                tracing::error!("Failed to create account: {:?}", other);
                AppError::Database(other)
            }
        })?;

        Ok(account)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get account by id: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Exact, case-sensitive email lookup
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get account by email: {:?}", e);
            AppError::Database(e)
        })
    }

    /// All accounts with the given role, in id order
    pub async fn list_by_role(&self, role: AccountRole) -> Result<Vec<Account>> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE role = ?
            ORDER BY id
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list accounts by role: {:?}", e);
            AppError::Database(e)
        })
    }

    #[cfg(test)]
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    #[cfg(test)]
    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{fake_email, test_pool};

    #[tokio::test]
    async fn test_create_and_find() {
        let service = AccountService::new(test_pool().await);

        let created = service
            .create("ana@example.com", "hash", AccountRole::Patient)
            .await
            .unwrap();
        assert_eq!(created.role, AccountRole::Patient);

        let by_email = service
            .find_by_email("ana@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let service = AccountService::new(test_pool().await);
        service
            .create("ana@example.com", "hash", AccountRole::Patient)
            .await
            .unwrap();

        assert!(service
            .find_by_email("ANA@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_error() {
        let service = AccountService::new(test_pool().await);
        let email = fake_email();
        service
            .create(&email, "hash", AccountRole::Patient)
            .await
            .unwrap();

        let result = service.create(&email, "other", AccountRole::Admin).await;
        assert!(matches!(result, Err(AppError::DuplicateEmail)));
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_by_role() {
        let service = AccountService::new(test_pool().await);
        service
            .create("p1@example.com", "h", AccountRole::Patient)
            .await
            .unwrap();
        service
            .create("d1@example.com", "h", AccountRole::Admin)
            .await
            .unwrap();
        service
            .create("p2@example.com", "h", AccountRole::Patient)
            .await
            .unwrap();

        let patients = service.list_by_role(AccountRole::Patient).await.unwrap();
        let emails: Vec<_> = patients.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails, vec!["p1@example.com", "p2@example.com"]);

        let admins = service.list_by_role(AccountRole::Admin).await.unwrap();
        assert_eq!(admins.len(), 1);
    }
}
