//! PostgreSQL implementation of MemberDirectory over the storefront `users` table.

use crate::domain::foundation::{DomainError, Email};
use crate::ports::MemberDirectory;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn is_member(&self, email: &Email) -> Result<Option<bool>, DomainError> {
        let flag: Option<bool> =
            sqlx::query_scalar("SELECT is_member FROM users WHERE LOWER(email) = $1")
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to read member flag: {}", e)))?;

        Ok(flag)
    }

    async fn set_member(&self, email: &Email, is_member: bool) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE users SET is_member = $2, updated_at = NOW() WHERE LOWER(email) = $1",
        )
        .bind(email.as_str())
        .bind(is_member)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to write member flag: {}", e)))?;

        if result.rows_affected() == 0 {
            tracing::debug!(email = %email, "No user account for member flag");
        }
        Ok(())
    }
}
