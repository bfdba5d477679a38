//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMembershipRepository` - Membership cycles with version compare-and-swap
//! - `PostgresMembershipRequestRepository` - Purchase requests
//! - `PostgresRewardClaimRepository` - Reward claim audit trail
//! - `PostgresMemberDirectory` - `users.is_member` flag

mod claim_repository;
mod member_directory;
mod membership_repository;
mod request_repository;

pub use claim_repository::PostgresRewardClaimRepository;
pub use member_directory::PostgresMemberDirectory;
pub use membership_repository::PostgresMembershipRepository;
pub use request_repository::PostgresMembershipRequestRepository;
