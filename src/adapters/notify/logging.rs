//! Log-only notifier, used when no email provider is configured.

use async_trait::async_trait;

use crate::domain::claim::RewardClaim;
use crate::domain::foundation::DomainError;
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;
use crate::ports::Notifier;

use super::{EmailMessage, MessageComposer};

pub struct LoggingNotifier {
    composer: MessageComposer,
}

impl LoggingNotifier {
    pub fn new(composer: MessageComposer) -> Self {
        Self { composer }
    }

    fn log(&self, message: EmailMessage) {
        tracing::info!(to = %message.to, subject = %message.subject, "Email not sent (no provider configured)");
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn membership_request_received(
        &self,
        request: &MembershipRequest,
    ) -> Result<(), DomainError> {
        self.log(self.composer.membership_request_received(request));
        Ok(())
    }

    async fn membership_approved(&self, membership: &Membership) -> Result<(), DomainError> {
        self.log(self.composer.membership_approved(membership));
        Ok(())
    }

    async fn reward_claim_submitted(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        self.log(self.composer.reward_claim_submitted(claim));
        Ok(())
    }

    async fn claim_status_changed(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        if let Some(message) = self.composer.claim_status_changed(claim) {
            self.log(message);
        }
        Ok(())
    }
}
