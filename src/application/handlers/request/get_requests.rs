//! Membership request queries.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::membership::MembershipError;
use crate::domain::request::MembershipRequest;
use crate::ports::MembershipRequestRepository;

/// Admin listing, newest submission first.
pub struct ListMembershipRequestsHandler {
    requests: Arc<dyn MembershipRequestRepository>,
}

impl ListMembershipRequestsHandler {
    pub fn new(requests: Arc<dyn MembershipRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(&self) -> Result<Vec<MembershipRequest>, MembershipError> {
        Ok(self.requests.list_all().await?)
    }
}

#[derive(Debug, Clone)]
pub struct GetPendingRequestQuery {
    pub email: String,
}

/// The request still waiting for review for an email, if any.
pub struct GetPendingRequestHandler {
    requests: Arc<dyn MembershipRequestRepository>,
}

impl GetPendingRequestHandler {
    pub fn new(requests: Arc<dyn MembershipRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(
        &self,
        query: GetPendingRequestQuery,
    ) -> Result<Option<MembershipRequest>, MembershipError> {
        let email = Email::new(&query.email)?;
        Ok(self.requests.find_pending_by_email(&email).await?)
    }
}
