//! Reward claim domain module.
//!
//! - `claim` - RewardClaim entity and reward-specific details
//! - `status` - ClaimStatus workflow and RewardType

#[allow(clippy::module_inception)]
mod claim;
mod status;

pub use claim::{ClaimDetails, RewardClaim};
pub use status::{ClaimStatus, RewardType};
