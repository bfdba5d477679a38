//! In-memory reward claim repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::claim::RewardClaim;
use crate::domain::foundation::{DomainError, ErrorCode, RewardClaimId};
use crate::ports::RewardClaimRepository;

#[derive(Default)]
pub struct InMemoryRewardClaimRepository {
    claims: RwLock<HashMap<RewardClaimId, RewardClaim>>,
}

impl InMemoryRewardClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RewardClaimRepository for InMemoryRewardClaimRepository {
    async fn save(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        self.claims.write().await.insert(claim.id, claim.clone());
        Ok(())
    }

    async fn update(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        let mut claims = self.claims.write().await;
        let Some(stored) = claims.get_mut(&claim.id) else {
            return Err(DomainError::new(
                ErrorCode::ClaimNotFound,
                format!("Reward claim not found: {}", claim.id),
            ));
        };
        *stored = claim.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &RewardClaimId) -> Result<Option<RewardClaim>, DomainError> {
        Ok(self.claims.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<RewardClaim>, DomainError> {
        let mut all: Vec<RewardClaim> = self.claims.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(all)
    }
}
