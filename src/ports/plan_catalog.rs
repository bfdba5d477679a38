//! Plan catalog port.
//!
//! Read-only source of the plans a member can buy. Memberships copy the
//! plan terms at activation, so catalog edits never touch running cycles.

use crate::domain::foundation::DomainError;
use crate::domain::membership::{Plan, LEGACY_DEFAULT_PLAN};
use async_trait::async_trait;

#[async_trait]
pub trait PlanCatalog: Send + Sync {
    /// Look up a plan by id.
    async fn find(&self, plan_id: &str) -> Result<Option<Plan>, DomainError>;

    /// All configured plans.
    async fn list(&self) -> Result<Vec<Plan>, DomainError>;

    /// Resolve a plan id, falling back to the legacy default plan when the
    /// id is absent or unknown.
    async fn resolve(&self, plan_id: Option<&str>) -> Result<Plan, DomainError> {
        let Some(id) = plan_id else {
            return Ok(LEGACY_DEFAULT_PLAN.clone());
        };
        Ok(self
            .find(id)
            .await?
            .unwrap_or_else(|| LEGACY_DEFAULT_PLAN.clone()))
    }
}
