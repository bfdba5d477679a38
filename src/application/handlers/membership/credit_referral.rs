//! CreditReferralHandler - Credits a referral code for a new registration.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::membership::{
    Membership, MembershipError, MilestoneOutcome, ReferralKind, ReferredParty,
};

use super::super::effects::DegradedEffect;
use super::ReferralCreditor;

/// Command to credit a registration against a referral code.
#[derive(Debug, Clone)]
pub struct CreditReferralCommand {
    pub referral_code: String,
    pub referred_name: String,
    pub email: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreditReferralResult {
    pub membership: Membership,
    pub milestone: MilestoneOutcome,
    pub degraded: Vec<DegradedEffect>,
}

pub struct CreditReferralHandler {
    creditor: Arc<ReferralCreditor>,
}

impl CreditReferralHandler {
    pub fn new(creditor: Arc<ReferralCreditor>) -> Self {
        Self { creditor }
    }

    pub async fn handle(
        &self,
        cmd: CreditReferralCommand,
    ) -> Result<CreditReferralResult, MembershipError> {
        if cmd.referral_code.trim().is_empty() {
            return Err(MembershipError::validation(
                "referralCode",
                "referral code is required",
            ));
        }
        let name = cmd.referred_name.trim();
        if name.is_empty() {
            return Err(MembershipError::validation(
                "referredUserName",
                "referred user name is required",
            ));
        }

        let mut party = ReferredParty::new(name);
        if let Some(email) = cmd.email.as_deref().filter(|e| !e.trim().is_empty()) {
            party = party.with_email(Email::new(email)?);
        }
        if let Some(mobile) = cmd.mobile.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            party = party.with_mobile(mobile);
        }

        let outcome = self
            .creditor
            .credit(&cmd.referral_code, party, ReferralKind::Registration)
            .await?;

        Ok(CreditReferralResult {
            membership: outcome.membership,
            milestone: outcome.milestone,
            degraded: outcome.degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;

    fn handler(fx: &Fixture) -> CreditReferralHandler {
        CreditReferralHandler::new(Arc::new(ReferralCreditor::new(
            fx.memberships.clone(),
            fx.directory.clone(),
        )))
    }

    fn cmd(code: &str, name: &str) -> CreditReferralCommand {
        CreditReferralCommand {
            referral_code: code.to_string(),
            referred_name: name.to_string(),
            email: Some("devi@example.com".to_string()),
            mobile: None,
        }
    }

    #[tokio::test]
    async fn credits_registration_with_identity() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "ABC123").await;

        let result = handler(&fx).handle(cmd("abc123", "Devi")).await.unwrap();
        assert_eq!(result.membership.referral_count, 1);
        let referral = &result.membership.referrals[0];
        assert_eq!(referral.name, "Devi");
        assert_eq!(referral.kind, ReferralKind::Registration);
        assert_eq!(
            referral.email.as_ref().map(|e| e.as_str()),
            Some("devi@example.com")
        );
        assert_eq!(result.milestone, MilestoneOutcome::Pending { remaining: 6 });
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let fx = Fixture::new();
        let err = handler(&fx).handle(cmd("ZZZ0000", "Devi")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let fx = Fixture::new();
        fx.member("meena@example.com", "ABC123").await;
        let err = handler(&fx).handle(cmd("ABC123", "  ")).await.unwrap_err();
        assert!(matches!(err, MembershipError::ValidationFailed { .. }));
        assert_eq!(fx.load("meena@example.com").await.referral_count, 0);
    }
}
