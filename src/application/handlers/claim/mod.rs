//! Reward claim handlers.

mod list_claims;
mod projection;
mod submit_claim;
mod update_claim_status;

pub use list_claims::ListRewardClaimsHandler;
pub use projection::MAX_PROJECTION_ATTEMPTS;
pub use submit_claim::{SubmitRewardClaimCommand, SubmitRewardClaimHandler, SubmitRewardClaimResult};
pub use update_claim_status::{
    UpdateClaimStatusCommand, UpdateClaimStatusHandler, UpdateClaimStatusResult,
};
