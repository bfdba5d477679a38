//! Member directory port.
//!
//! The storefront's user store keeps an `is_member` flag per account. The
//! membership engine writes it when a cycle starts or completes; the write is
//! a secondary effect and its failure never fails the primary operation.

use crate::domain::foundation::{DomainError, Email};
use async_trait::async_trait;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Current flag for the account, `None` when no account uses the email.
    async fn is_member(&self, email: &Email) -> Result<Option<bool>, DomainError>;

    /// Sets the flag. Unknown emails are a no-op.
    async fn set_member(&self, email: &Email, is_member: bool) -> Result<(), DomainError>;
}
