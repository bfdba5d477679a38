//! Membership request repository port.

use crate::domain::foundation::{DomainError, Email, MembershipRequestId};
use crate::domain::request::MembershipRequest;
use async_trait::async_trait;

/// Repository port for membership purchase requests.
#[async_trait]
pub trait MembershipRequestRepository: Send + Sync {
    /// Save a new request.
    async fn save(&self, request: &MembershipRequest) -> Result<(), DomainError>;

    /// Persist a decision on an existing request.
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if the request doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, request: &MembershipRequest) -> Result<(), DomainError>;

    async fn find_by_id(
        &self,
        id: &MembershipRequestId,
    ) -> Result<Option<MembershipRequest>, DomainError>;

    /// Most recent pending request for an email, if any.
    async fn find_pending_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<MembershipRequest>, DomainError>;

    /// All requests, newest first.
    async fn list_all(&self) -> Result<Vec<MembershipRequest>, DomainError>;
}
