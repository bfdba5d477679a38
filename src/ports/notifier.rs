//! Notifier port.
//!
//! Email dispatch for the membership workflow. Delivery mechanics live in
//! adapters; callers treat every send as best-effort.

use crate::domain::claim::RewardClaim;
use crate::domain::foundation::DomainError;
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;
use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tell the admin a payment is waiting for review.
    async fn membership_request_received(
        &self,
        request: &MembershipRequest,
    ) -> Result<(), DomainError>;

    /// Tell the member their membership is active, with their referral code.
    async fn membership_approved(&self, membership: &Membership) -> Result<(), DomainError>;

    /// Tell the admin a reward claim was submitted.
    async fn reward_claim_submitted(&self, claim: &RewardClaim) -> Result<(), DomainError>;

    /// Tell the member their claim moved to a new status.
    async fn claim_status_changed(&self, claim: &RewardClaim) -> Result<(), DomainError>;
}
