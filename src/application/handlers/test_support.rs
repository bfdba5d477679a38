//! Shared fixtures for handler tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapters::memory::{
    InMemoryMemberDirectory, InMemoryMembershipRepository, InMemoryMembershipRequestRepository,
    InMemoryRewardClaimRepository,
};
use crate::adapters::notify::RecordingNotifier;
use crate::adapters::plans::StaticPlanCatalog;
use crate::domain::claim::{ClaimStatus, RewardClaim, RewardType};
use crate::domain::foundation::{DomainError, Email};
use crate::domain::membership::{Membership, Plan, ReferralCode, LEGACY_DEFAULT_PLAN};
use crate::domain::request::MembershipRequest;
use crate::ports::{MembershipRepository, Notifier};

pub(crate) struct Fixture {
    pub memberships: Arc<InMemoryMembershipRepository>,
    pub requests: Arc<InMemoryMembershipRequestRepository>,
    pub claims: Arc<InMemoryRewardClaimRepository>,
    pub directory: Arc<InMemoryMemberDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub plans: Arc<StaticPlanCatalog>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            memberships: Arc::new(InMemoryMembershipRepository::new()),
            requests: Arc::new(InMemoryMembershipRequestRepository::new()),
            claims: Arc::new(InMemoryRewardClaimRepository::new()),
            directory: Arc::new(InMemoryMemberDirectory::new()),
            notifier: Arc::new(RecordingNotifier::new()),
            plans: Arc::new(StaticPlanCatalog::builtin()),
        }
    }

    /// Stores a first-cycle membership on the legacy default plan.
    pub async fn member(&self, email: &str, code: &str) -> Membership {
        self.member_on(email, code, &LEGACY_DEFAULT_PLAN).await
    }

    pub async fn member_on(&self, email: &str, code: &str, plan: &Plan) -> Membership {
        let membership = Membership::activate(
            Email::new(email).unwrap(),
            "Meena",
            "9000000001",
            plan,
            ReferralCode::new(code).unwrap(),
        );
        self.memberships.insert(&membership).await.unwrap();
        membership
    }

    /// Marks both reward tracks fulfilled on a stored membership.
    pub async fn fulfil_rewards(&self, email: &str) -> Membership {
        let mut membership = self.load(email).await;
        membership.apply_claim_status(RewardType::Cashback, ClaimStatus::Completed);
        membership.apply_claim_status(RewardType::Gold, ClaimStatus::Completed);
        self.memberships.update(&mut membership).await.unwrap();
        membership
    }

    pub async fn load(&self, email: &str) -> Membership {
        self.memberships
            .find_by_email(&Email::new(email).unwrap())
            .await
            .unwrap()
            .unwrap()
    }
}

/// Notifier whose provider never answers.
pub(crate) struct StalledNotifier;

impl StalledNotifier {
    async fn hang() -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

#[async_trait]
impl Notifier for StalledNotifier {
    async fn membership_request_received(
        &self,
        _request: &MembershipRequest,
    ) -> Result<(), DomainError> {
        Self::hang().await
    }

    async fn membership_approved(&self, _membership: &Membership) -> Result<(), DomainError> {
        Self::hang().await
    }

    async fn reward_claim_submitted(&self, _claim: &RewardClaim) -> Result<(), DomainError> {
        Self::hang().await
    }

    async fn claim_status_changed(&self, _claim: &RewardClaim) -> Result<(), DomainError> {
        Self::hang().await
    }
}
