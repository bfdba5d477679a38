//! In-memory membership repository with a referral-code index.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email};
use crate::domain::membership::{Membership, ReferralCode};
use crate::ports::MembershipRepository;

#[derive(Default)]
struct Store {
    by_email: HashMap<Email, Membership>,
    /// Normalized referral code -> owner email.
    code_index: HashMap<String, Email>,
}

impl Store {
    fn code_taken_by_other(&self, membership: &Membership) -> bool {
        self.code_index
            .get(&membership.referral_code.key())
            .is_some_and(|owner| owner != &membership.email)
    }
}

/// Membership store keyed by email with version compare-and-swap.
#[derive(Default)]
pub struct InMemoryMembershipRepository {
    store: RwLock<Store>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored memberships.
    pub async fn len(&self) -> usize {
        self.store.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn insert(&self, membership: &Membership) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if store.by_email.contains_key(&membership.email) {
            return Err(DomainError::conflict(membership.email.as_str()));
        }
        if store.code_taken_by_other(membership) {
            return Err(DomainError::conflict(membership.referral_code.as_str()));
        }

        store
            .code_index
            .insert(membership.referral_code.key(), membership.email.clone());
        store
            .by_email
            .insert(membership.email.clone(), membership.clone());
        Ok(())
    }

    async fn update(&self, membership: &mut Membership) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let previous_code = match store.by_email.get(&membership.email) {
            Some(stored) if stored.version == membership.version => stored.referral_code.key(),
            _ => return Err(DomainError::conflict(membership.email.as_str())),
        };
        if store.code_taken_by_other(membership) {
            return Err(DomainError::conflict(membership.referral_code.as_str()));
        }

        membership.version += 1;
        store.code_index.remove(&previous_code);
        store
            .code_index
            .insert(membership.referral_code.key(), membership.email.clone());
        store
            .by_email
            .insert(membership.email.clone(), membership.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Membership>, DomainError> {
        Ok(self.store.read().await.by_email.get(email).cloned())
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Membership>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .code_index
            .get(&ReferralCode::normalize(code))
            .and_then(|email| store.by_email.get(email))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
        let mut all: Vec<Membership> = self.store.read().await.by_email.values().cloned().collect();
        all.sort_by(|a, b| b.activated_at.cmp(&a.activated_at));
        Ok(all)
    }
}
