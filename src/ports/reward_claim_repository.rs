//! Reward claim repository port.

use crate::domain::claim::RewardClaim;
use crate::domain::foundation::{DomainError, RewardClaimId};
use async_trait::async_trait;

/// Repository port for reward claims.
///
/// Claims are append-only; `update` only changes workflow status.
#[async_trait]
pub trait RewardClaimRepository: Send + Sync {
    async fn save(&self, claim: &RewardClaim) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ClaimNotFound` if the claim doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, claim: &RewardClaim) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &RewardClaimId) -> Result<Option<RewardClaim>, DomainError>;

    /// All claims, newest submission first.
    async fn list_all(&self) -> Result<Vec<RewardClaim>, DomainError>;
}
