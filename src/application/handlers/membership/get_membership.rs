//! Membership queries.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::MembershipRepository;

/// Query to get a member's membership.
#[derive(Debug, Clone)]
pub struct GetMembershipQuery {
    pub email: String,
}

/// Returns the membership for an email, or `None` if the email never bought one.
pub struct GetMembershipHandler {
    memberships: Arc<dyn MembershipRepository>,
}

impl GetMembershipHandler {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    pub async fn handle(
        &self,
        query: GetMembershipQuery,
    ) -> Result<Option<Membership>, MembershipError> {
        let email = Email::new(&query.email)?;
        Ok(self.memberships.find_by_email(&email).await?)
    }
}

/// Admin listing of every membership.
pub struct ListMembershipsHandler {
    memberships: Arc<dyn MembershipRepository>,
}

impl ListMembershipsHandler {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    pub async fn handle(&self) -> Result<Vec<Membership>, MembershipError> {
        Ok(self.memberships.list_all().await?)
    }
}
