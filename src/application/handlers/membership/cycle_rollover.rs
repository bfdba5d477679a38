//! CycleRollover - shared archive-and-reset routine.
//!
//! Both renewal entry points (approval of a renewal payment and the
//! member-initiated renew call) go through here, as does first activation
//! for code issuance.

use std::sync::Arc;

use crate::domain::membership::{Membership, MembershipError, Plan, ReferralCode};
use crate::ports::MembershipRepository;

/// Attempts at drawing a code that no other membership holds.
const MAX_CODE_ATTEMPTS: usize = 5;

pub struct CycleRollover {
    memberships: Arc<dyn MembershipRepository>,
}

impl CycleRollover {
    pub fn new(memberships: Arc<dyn MembershipRepository>) -> Self {
        Self { memberships }
    }

    /// Draws a fresh referral code not indexed by any membership.
    pub async fn issue_code(&self, member_name: &str) -> Result<ReferralCode, MembershipError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = ReferralCode::generate(member_name);
            if self
                .memberships
                .find_by_referral_code(code.as_str())
                .await?
                .is_none()
            {
                return Ok(code);
            }
            tracing::debug!(code = %code, "Referral code collision, drawing again");
        }
        Err(MembershipError::infrastructure(
            "could not allocate a unique referral code",
        ))
    }

    /// Archives the current cycle, starts a new one on `plan`, and persists it.
    ///
    /// # Errors
    ///
    /// - `CycleIncomplete` unless both reward tracks are fulfilled
    /// - `Conflict` if the record changed since it was loaded
    pub async fn roll_over(
        &self,
        membership: &mut Membership,
        plan: &Plan,
    ) -> Result<(), MembershipError> {
        if !membership.is_fully_claimed() {
            return Err(MembershipError::cycle_incomplete(membership.email.clone()));
        }

        let code = self.issue_code(&membership.name).await?;
        let archived = membership.rollover(plan, code)?.cycle_number;
        self.memberships.update(membership).await?;

        tracing::info!(
            email = %membership.email,
            archived_cycle = archived,
            plan_id = %plan.id,
            referral_code = %membership.referral_code,
            "Membership rolled over"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;
    use crate::domain::membership::{MembershipStatus, LEGACY_DEFAULT_PLAN};

    #[tokio::test]
    async fn issued_codes_avoid_existing_ones() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "MEE0000").await;
        let rollover = CycleRollover::new(fx.memberships.clone());

        let code = rollover.issue_code("Meena").await.unwrap();
        assert!(code.as_str().starts_with("MEE"));
        assert_ne!(code.as_str(), "MEE0000");
    }

    #[tokio::test]
    async fn roll_over_persists_new_cycle() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "ABC123").await;
        let mut membership = fx.fulfil_rewards("meena@example.com").await;
        let rollover = CycleRollover::new(fx.memberships.clone());

        rollover
            .roll_over(&mut membership, &LEGACY_DEFAULT_PLAN)
            .await
            .unwrap();

        let stored = fx.load("meena@example.com").await;
        assert_eq!(stored.history.len(), 1);
        assert_eq!(stored.renewal_count, 1);
        assert_eq!(stored.status, MembershipStatus::Active);
        assert_ne!(stored.referral_code.as_str(), "ABC123");
        assert_eq!(stored.version, membership.version);
    }

    #[tokio::test]
    async fn roll_over_refuses_incomplete_cycle() {
        let fx = Fixture::new();
        let mut membership = fx.member("meena@example.com", "ABC123").await;
        let rollover = CycleRollover::new(fx.memberships.clone());

        let err = rollover
            .roll_over(&mut membership, &LEGACY_DEFAULT_PLAN)
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::CycleIncomplete(_)));
        assert!(fx.load("meena@example.com").await.history.is_empty());
    }
}
