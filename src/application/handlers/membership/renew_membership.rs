//! RenewMembershipHandler - Member-initiated cycle rollover.
//!
//! Same archive-and-reset as approving a renewal payment, without a new
//! request. The next cycle uses the plan named in the command, or the
//! current plan's latest catalog terms.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::membership::{Membership, MembershipError};
use crate::ports::{MemberDirectory, MembershipRepository, PlanCatalog};

use super::super::effects::{set_member_flag, DegradedEffect};
use super::CycleRollover;

#[derive(Debug, Clone)]
pub struct RenewMembershipCommand {
    pub email: String,
    pub plan_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RenewMembershipResult {
    pub membership: Membership,
    pub degraded: Vec<DegradedEffect>,
}

pub struct RenewMembershipHandler {
    memberships: Arc<dyn MembershipRepository>,
    plans: Arc<dyn PlanCatalog>,
    directory: Arc<dyn MemberDirectory>,
    rollover: Arc<CycleRollover>,
}

impl RenewMembershipHandler {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        plans: Arc<dyn PlanCatalog>,
        directory: Arc<dyn MemberDirectory>,
        rollover: Arc<CycleRollover>,
    ) -> Self {
        Self {
            memberships,
            plans,
            directory,
            rollover,
        }
    }

    pub async fn handle(
        &self,
        cmd: RenewMembershipCommand,
    ) -> Result<RenewMembershipResult, MembershipError> {
        let email = Email::new(&cmd.email)?;
        let mut membership = self
            .memberships
            .find_by_email(&email)
            .await?
            .ok_or_else(|| MembershipError::not_found(email.clone()))?;

        let plan_id = cmd.plan_id.unwrap_or_else(|| membership.plan.id.clone());
        let plan = self.plans.resolve(Some(plan_id.as_str())).await?;

        self.rollover.roll_over(&mut membership, &plan).await?;

        let degraded = set_member_flag(self.directory.as_ref(), &email, true)
            .await
            .into_iter()
            .collect();

        Ok(RenewMembershipResult {
            membership,
            degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::claim::{ClaimStatus, RewardType};
    use crate::domain::membership::{MembershipStatus, RewardState};

    fn handler(fx: &Fixture) -> RenewMembershipHandler {
        RenewMembershipHandler::new(
            fx.memberships.clone(),
            fx.plans.clone(),
            fx.directory.clone(),
            Arc::new(CycleRollover::new(fx.memberships.clone())),
        )
    }

    fn cmd(email: &str) -> RenewMembershipCommand {
        RenewMembershipCommand {
            email: email.to_string(),
            plan_id: None,
        }
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let fx = Fixture::new();
        let err = handler(&fx)
            .handle(cmd("nobody@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::NotFound(_)));
    }

    #[tokio::test]
    async fn half_claimed_cycle_cannot_renew() {
        let fx = Fixture::new();
        let mut m = fx.member("meena@example.com", "ABC123").await;
        m.apply_claim_status(RewardType::Cashback, ClaimStatus::Completed);
        fx.memberships.update(&mut m).await.unwrap();

        let err = handler(&fx)
            .handle(cmd("meena@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::CycleIncomplete(_)));
        assert!(fx.load("meena@example.com").await.history.is_empty());
    }

    #[tokio::test]
    async fn renewal_archives_and_resets() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "ABC123").await;
        fx.fulfil_rewards("meena@example.com").await;

        let result = handler(&fx)
            .handle(cmd("Meena@Example.com"))
            .await
            .unwrap();

        let m = result.membership;
        assert_eq!(m.history.len(), 1);
        assert_eq!(m.history[0].referral_code.as_str(), "ABC123");
        assert_ne!(m.referral_code.as_str(), "ABC123");
        assert_eq!(m.referral_count, 0);
        assert_eq!(m.renewal_count, 1);
        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(m.money_back_claimed, RewardState::NotClaimed);
        assert_eq!(
            fx.directory.is_member(&m.email).await.unwrap(),
            Some(true)
        );
    }

    #[tokio::test]
    async fn renewal_can_switch_plan() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "ABC123").await;
        fx.fulfil_rewards("meena@example.com").await;

        let result = handler(&fx)
            .handle(RenewMembershipCommand {
                email: "meena@example.com".to_string(),
                plan_id: Some("elite".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(result.membership.plan.id, "elite");
        assert_eq!(result.membership.completion_goal(), 5);
    }
}
