//! ListRewardClaimsHandler - Admin view of every claim.

use std::sync::Arc;

use crate::domain::claim::RewardClaim;
use crate::domain::membership::MembershipError;
use crate::ports::RewardClaimRepository;

pub struct ListRewardClaimsHandler {
    claims: Arc<dyn RewardClaimRepository>,
}

impl ListRewardClaimsHandler {
    pub fn new(claims: Arc<dyn RewardClaimRepository>) -> Self {
        Self { claims }
    }

    /// Newest submission first.
    pub async fn handle(&self) -> Result<Vec<RewardClaim>, MembershipError> {
        Ok(self.claims.list_all().await?)
    }
}
