//! In-memory membership request repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Email, ErrorCode, MembershipRequestId};
use crate::domain::request::MembershipRequest;
use crate::ports::MembershipRequestRepository;

#[derive(Default)]
pub struct InMemoryMembershipRequestRepository {
    requests: RwLock<HashMap<MembershipRequestId, MembershipRequest>>,
}

impl InMemoryMembershipRequestRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRequestRepository for InMemoryMembershipRequestRepository {
    async fn save(&self, request: &MembershipRequest) -> Result<(), DomainError> {
        self.requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(())
    }

    async fn update(&self, request: &MembershipRequest) -> Result<(), DomainError> {
        let mut requests = self.requests.write().await;
        match requests.get_mut(&request.id) {
            Some(stored) => {
                *stored = request.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Membership request not found: {}", request.id),
            )),
        }
    }

    async fn find_by_id(
        &self,
        id: &MembershipRequestId,
    ) -> Result<Option<MembershipRequest>, DomainError> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn find_pending_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<MembershipRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| &r.email == email && r.is_pending())
            .max_by_key(|r| r.submitted_at)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<MembershipRequest>, DomainError> {
        let mut all: Vec<MembershipRequest> =
            self.requests.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(all)
    }
}
