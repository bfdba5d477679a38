//! In-memory adapters.
//!
//! Used by tests and by deployments that run without a database. State
//! lives behind `tokio::sync::RwLock`, so nothing here can poison.

mod claim_repository;
mod member_directory;
mod membership_repository;
mod request_repository;

pub use claim_repository::InMemoryRewardClaimRepository;
pub use member_directory::InMemoryMemberDirectory;
pub use membership_repository::InMemoryMembershipRepository;
pub use request_repository::InMemoryMembershipRequestRepository;
