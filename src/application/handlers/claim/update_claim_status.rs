//! UpdateClaimStatusHandler - Admin moves a claim through its workflow.
//!
//! The new status is projected onto the member's reward track:
//! `completed` fulfils it, `rejected` reopens it, anything else is copied.
//! Claims filed in an archived cycle only update their own record; the
//! current cycle's tracks are left alone.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::claim::{ClaimStatus, RewardClaim};
use crate::domain::foundation::RewardClaimId;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{MembershipRepository, Notifier, RewardClaimRepository};

use super::super::effects::{dispatch_notification, NotificationKind};
use super::projection::project_onto_membership;

#[derive(Debug, Clone)]
pub struct UpdateClaimStatusCommand {
    pub id: RewardClaimId,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct UpdateClaimStatusResult {
    pub claim: RewardClaim,
    pub membership: Membership,
    /// False when the claim belongs to an archived cycle.
    pub projected: bool,
}

pub struct UpdateClaimStatusHandler {
    claims: Arc<dyn RewardClaimRepository>,
    memberships: Arc<dyn MembershipRepository>,
    notifier: Arc<dyn Notifier>,
}

impl UpdateClaimStatusHandler {
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
    /// - `ValidationFailed` for an unknown status string
    /// - `ClaimNotFound` if the claim doesn't exist
    /// - `InvalidState` if the claim is already completed or rejected
    /// - `NotFound` if the claim's member no longer has a membership
    pub async fn handle(
        &self,
        cmd: UpdateClaimStatusCommand,
    ) -> Result<UpdateClaimStatusResult, MembershipError> {
        let target = ClaimStatus::from_str(&cmd.status)?;
        let mut claim = self
            .claims
            .find_by_id(&cmd.id)
            .await?
            .ok_or_else(|| MembershipError::claim_not_found(cmd.id))?;

        let previous = claim.status;
        claim.update_status(target)?;
        let reward = claim.reward_type();

        let cycle = claim.cycle_number;
        let membership = project_onto_membership(self.memberships.as_ref(), &claim.email, |m| {
            if !claim.belongs_to_cycle(m.cycle_number()) {
                return Ok(false);
            }
            m.apply_claim_status(reward, target);
            Ok(true)
        })
        .await?;
        let projected = claim.belongs_to_cycle(membership.cycle_number());
        if !projected {
            tracing::warn!(
                claim_id = %claim.id,
                email = %claim.email,
                claim_cycle = cycle,
                current_cycle = membership.cycle_number(),
                "Claim belongs to an archived cycle, membership left unchanged"
            );
        }

        self.claims.update(&claim).await?;
        tracing::info!(
            claim_id = %claim.id,
            email = %claim.email,
            reward = %reward,
            from = %previous,
            to = %target,
            track = %membership.reward_state(reward),
            projected,
            "Reward claim status updated"
        );

        if target.notifies_member() {
            let notifier = self.notifier.clone();
            let changed = claim.clone();
            dispatch_notification(NotificationKind::ClaimStatusChanged, async move {
                notifier.claim_status_changed(&changed).await
            });
        }

        Ok(UpdateClaimStatusResult {
            claim,
            membership,
            projected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, StalledNotifier};
    use crate::domain::claim::{ClaimDetails, RewardType};
    use crate::domain::foundation::Email;
    use crate::domain::membership::{ReferralCode, RewardState, LEGACY_DEFAULT_PLAN};
    use std::time::Duration;

    fn handler(fx: &Fixture) -> UpdateClaimStatusHandler {
        UpdateClaimStatusHandler::new(
            fx.claims.clone(),
            fx.memberships.clone(),
            fx.notifier.clone(),
        )
    }

    async fn gold_claim(fx: &Fixture) -> RewardClaimId {
        let mut membership = fx.member("meena@example.com", "MEE1234").await;
        membership.begin_claim(RewardType::Gold).unwrap();
        fx.memberships.update(&mut membership).await.unwrap();

        let claim = RewardClaim::submit(
            Email::new("meena@example.com").unwrap(),
            "Meena",
            "9000000001",
            None,
            ClaimDetails::Gold {
                delivery_address: "4 Car Street, Trichy".to_string(),
            },
        )
        .unwrap();
        fx.claims.save(&claim).await.unwrap();
        claim.id
    }

    fn cmd(id: RewardClaimId, status: &str) -> UpdateClaimStatusCommand {
        UpdateClaimStatusCommand {
            id,
            status: status.to_string(),
        }
    }

    #[tokio::test]
    async fn completion_fulfils_the_track_and_tells_the_member() {
        let fx = Fixture::new();
        let id = gold_claim(&fx).await;

        let in_progress = handler(&fx).handle(cmd(id, "in_progress")).await.unwrap();
        assert_eq!(in_progress.membership.gold_coin_claimed, RewardState::InProgress);

        let done = handler(&fx).handle(cmd(id, "completed")).await.unwrap();
        assert_eq!(done.claim.status, ClaimStatus::Completed);
        assert!(done.claim.updated_at.is_some());
        assert_eq!(done.membership.gold_coin_claimed, RewardState::Fulfilled);
        assert!(!done.membership.is_fully_claimed());
        assert!(done.projected);
        assert_eq!(fx.notifier.wait_for("meena@example.com", 2).await.len(), 2);
    }

    #[tokio::test]
    async fn rejection_reopens_the_track_silently() {
        let fx = Fixture::new();
        let id = gold_claim(&fx).await;

        let result = handler(&fx).handle(cmd(id, "rejected")).await.unwrap();
        assert_eq!(result.membership.gold_coin_claimed, RewardState::NotClaimed);
        assert!(fx.notifier.sent().await.is_empty());

        let stored = fx.claims.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::Rejected);
    }

    #[tokio::test]
    async fn terminal_claims_do_not_move() {
        let fx = Fixture::new();
        let id = gold_claim(&fx).await;
        handler(&fx).handle(cmd(id, "completed")).await.unwrap();

        let err = handler(&fx).handle(cmd(id, "pending")).await.unwrap_err();
        assert!(matches!(err, MembershipError::InvalidState { .. }));
        assert_eq!(
            fx.load("meena@example.com").await.gold_coin_claimed,
            RewardState::Fulfilled
        );
    }

    #[tokio::test]
    async fn unknown_status_is_a_validation_error() {
        let fx = Fixture::new();
        let id = gold_claim(&fx).await;
        let err = handler(&fx).handle(cmd(id, "shipped")).await.unwrap_err();
        assert!(matches!(err, MembershipError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn archived_cycle_claim_leaves_current_cycle_alone() {
        let fx = Fixture::new();
        let stale = gold_claim(&fx).await;
        let mut m = fx.fulfil_rewards("meena@example.com").await;
        m.rollover(&LEGACY_DEFAULT_PLAN, ReferralCode::new("MEE5678").unwrap())
            .unwrap();
        fx.memberships.update(&mut m).await.unwrap();

        let result = handler(&fx).handle(cmd(stale, "completed")).await.unwrap();

        assert!(!result.projected);
        assert_eq!(result.claim.status, ClaimStatus::Completed);
        let current = fx.load("meena@example.com").await;
        assert_eq!(current.cycle_number(), 2);
        assert_eq!(current.gold_coin_claimed, RewardState::NotClaimed);
        assert_eq!(current.referral_count, 0);
        let stored = fx.claims.find_by_id(&stale).await.unwrap().unwrap();
        assert_eq!(stored.status, ClaimStatus::Completed);
    }

    #[tokio::test]
    async fn rejecting_archived_claim_keeps_current_track() {
        let fx = Fixture::new();
        let stale = gold_claim(&fx).await;
        let mut m = fx.fulfil_rewards("meena@example.com").await;
        m.rollover(&LEGACY_DEFAULT_PLAN, ReferralCode::new("MEE5678").unwrap())
            .unwrap();
        m.begin_claim(RewardType::Gold).unwrap();
        fx.memberships.update(&mut m).await.unwrap();

        let result = handler(&fx).handle(cmd(stale, "rejected")).await.unwrap();

        assert!(!result.projected);
        assert_eq!(
            fx.load("meena@example.com").await.gold_coin_claimed,
            RewardState::PendingAdmin
        );
    }

    #[tokio::test]
    async fn hung_email_provider_does_not_hold_status_update() {
        let fx = Fixture::new();
        let id = gold_claim(&fx).await;
        let handler = UpdateClaimStatusHandler::new(
            fx.claims.clone(),
            fx.memberships.clone(),
            Arc::new(StalledNotifier),
        );

        let result = tokio::time::timeout(
            Duration::from_millis(500),
            handler.handle(cmd(id, "completed")),
        )
        .await
        .expect("status update waited on email delivery")
        .unwrap();
        assert_eq!(result.membership.gold_coin_claimed, RewardState::Fulfilled);
    }

    #[tokio::test]
    async fn unknown_claim_is_not_found() {
        let fx = Fixture::new();
        let err = handler(&fx)
            .handle(cmd(RewardClaimId::new(), "completed"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::ClaimNotFound(_)));
    }
}
