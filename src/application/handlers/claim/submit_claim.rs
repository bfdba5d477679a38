//! SubmitRewardClaimHandler - Member asks for a cycle reward.

use std::sync::Arc;

use crate::domain::claim::{ClaimDetails, RewardClaim};
use crate::domain::foundation::Email;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{MembershipRepository, Notifier, RewardClaimRepository};

use super::super::effects::{dispatch_notification, NotificationKind};
use super::projection::project_onto_membership;

#[derive(Debug, Clone)]
pub struct SubmitRewardClaimCommand {
    pub email: String,
    pub name: String,
    pub mobile: String,
    pub membership_id: Option<String>,
    pub details: ClaimDetails,
}

#[derive(Debug, Clone)]
pub struct SubmitRewardClaimResult {
    pub claim: RewardClaim,
    pub membership: Membership,
}

/// Handler for reward claim submissions.
///
/// The claim's track moves to `PendingAdmin` before the claim is stored, so
/// an early renewal is refused even if the claim write is lost.
pub struct SubmitRewardClaimHandler {
    claims: Arc<dyn RewardClaimRepository>,
    memberships: Arc<dyn MembershipRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SubmitRewardClaimHandler {
    pub fn new(
        claims: Arc<dyn RewardClaimRepository>,
        memberships: Arc<dyn MembershipRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            claims,
            memberships,
            notifier,
        }
    }

    /// # Errors
    ///
    /// - `ValidationFailed` for a malformed payload
    /// - `NotFound` if the email has no membership
    /// - `InvalidState` if the member's plan does not offer the reward, or
    ///   the reward was already fulfilled this cycle
    pub async fn handle(
        &self,
        cmd: SubmitRewardClaimCommand,
    ) -> Result<SubmitRewardClaimResult, MembershipError> {
        let email = Email::new(&cmd.email)?;
        let mut claim = RewardClaim::submit(
            email.clone(),
            cmd.name,
            cmd.mobile,
            cmd.membership_id,
            cmd.details,
        )?;
        let reward = claim.reward_type();

        let membership = project_onto_membership(self.memberships.as_ref(), &email, |m| {
            m.begin_claim(reward)?;
            Ok(true)
        })
        .await?;
        claim.file_against(membership.cycle_number());

        self.claims.save(&claim).await?;
        tracing::info!(claim_id = %claim.id, email = %email, reward = %reward, cycle = claim.cycle_number, "Reward claim submitted");

        let notifier = self.notifier.clone();
        let submitted = claim.clone();
        dispatch_notification(NotificationKind::RewardClaimSubmitted, async move {
            notifier.reward_claim_submitted(&submitted).await
        });

        Ok(SubmitRewardClaimResult { claim, membership })
    }
}
