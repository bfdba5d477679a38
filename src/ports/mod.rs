//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `MembershipRepository` - Membership cycles keyed by email, indexed by referral code
//! - `MembershipRequestRepository` - Purchase requests awaiting review
//! - `RewardClaimRepository` - Reward claim audit trail
//!
//! ## Collaborator Ports
//!
//! - `PlanCatalog` - Plan terms lookup with legacy fallback
//! - `MemberDirectory` - Storefront user `is_member` flag
//! - `Notifier` - Workflow email dispatch

mod member_directory;
mod membership_repository;
mod membership_request_repository;
mod notifier;
mod plan_catalog;
mod reward_claim_repository;

pub use member_directory::MemberDirectory;
pub use membership_repository::MembershipRepository;
pub use membership_request_repository::MembershipRequestRepository;
pub use notifier::Notifier;
pub use plan_catalog::PlanCatalog;
pub use reward_claim_repository::RewardClaimRepository;
