//! ReferralCreditor - credits a referral code and evaluates the milestone.
//!
//! Used by registration crediting (`ReferralKind::Registration`) and by
//! membership approval (`ReferralKind::Membership`). Lookups go through the
//! repository's referral-code index. A lost compare-and-swap reloads the
//! referrer and reapplies the credit.

use std::sync::Arc;

use crate::domain::membership::{
    Membership, MembershipError, MilestoneOutcome, ReferralKind, ReferredParty,
};
use crate::ports::{MemberDirectory, MembershipRepository};

use super::super::effects::{set_member_flag, DegradedEffect};

/// Attempts at writing a credit before giving up on a contended record.
pub const MAX_CREDIT_ATTEMPTS: usize = 3;

/// A credited referrer.
#[derive(Debug, Clone)]
pub struct CreditOutcome {
    pub membership: Membership,
    pub milestone: MilestoneOutcome,
    pub degraded: Vec<DegradedEffect>,
}

pub struct ReferralCreditor {
    memberships: Arc<dyn MembershipRepository>,
    directory: Arc<dyn MemberDirectory>,
}

impl ReferralCreditor {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        directory: Arc<dyn MemberDirectory>,
    ) -> Self {
        Self {
            memberships,
            directory,
        }
    }

    /// Appends a referral to the membership owning `code`.
    ///
    /// When the credit completes the cycle, the referrer's `is_member` flag is
    /// cleared so they can buy the next cycle.
    ///
    /// # Errors
    ///
    /// - `ReferralCodeNotFound` if no membership holds the code
    /// - `ReferralBlocked` if the holder does not accept `kind` credits
    /// - `Conflict` if the record stayed contended for every attempt
    pub async fn credit(
        &self,
        code: &str,
        party: ReferredParty,
        kind: ReferralKind,
    ) -> Result<CreditOutcome, MembershipError> {
        let mut attempt = 1;
        let (membership, milestone) = loop {
            let mut membership = self
                .memberships
                .find_by_referral_code(code)
                .await?
                .ok_or_else(|| MembershipError::referral_code_not_found(code.trim()))?;

            let milestone = membership.credit_referral(party.clone(), kind)?;

            match self.memberships.update(&mut membership).await {
                Ok(()) => break (membership, milestone),
                Err(e) if e.is_conflict() && attempt < MAX_CREDIT_ATTEMPTS => {
                    tracing::debug!(referrer = %membership.email, attempt, "Referrer changed concurrently, retrying credit");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        };

        tracing::info!(
            referrer = %membership.email,
            kind = kind.as_str(),
            referral_count = membership.referral_count,
            goal = membership.completion_goal(),
            "Referral credited"
        );

        let mut degraded = Vec::new();
        if milestone == MilestoneOutcome::Reached {
            tracing::info!(referrer = %membership.email, "Referral cycle completed");
            degraded.extend(set_member_flag(self.directory.as_ref(), &membership.email, false).await);
        }

        Ok(CreditOutcome {
            membership,
            milestone,
            degraded,
        })
    }
}
