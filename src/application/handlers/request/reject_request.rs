//! RejectMembershipRequestHandler - Refuses a membership payment.

use std::sync::Arc;

use crate::domain::foundation::MembershipRequestId;
use crate::domain::membership::MembershipError;
use crate::domain::request::MembershipRequest;
use crate::ports::MembershipRequestRepository;

#[derive(Debug, Clone)]
pub struct RejectMembershipRequestCommand {
    pub id: MembershipRequestId,
}

pub struct RejectMembershipRequestHandler {
    requests: Arc<dyn MembershipRequestRepository>,
}

impl RejectMembershipRequestHandler {
    pub fn new(requests: Arc<dyn MembershipRequestRepository>) -> Self {
        Self { requests }
    }

    pub async fn handle(
        &self,
        cmd: RejectMembershipRequestCommand,
    ) -> Result<MembershipRequest, MembershipError> {
        let mut request = self
            .requests
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| MembershipError::request_not_found(cmd.id))?;

        request.reject()?;
        self.requests.update(&request).await?;
        tracing::info!(request_id = %request.id, email = %request.email, "Membership request rejected");

        Ok(request)
    }
}
