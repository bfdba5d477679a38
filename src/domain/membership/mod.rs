//! Membership domain module.
//!
//! Handles the referral reward cycle of a paying member: plan terms,
//! referral crediting, milestone completion, reward tracks and renewal.
//!
//! # Module Structure
//!
//! - `aggregate` - Membership aggregate entity
//! - `cycle` - Archived cycle snapshots
//! - `plan` - Plan catalog entries and the legacy default
//! - `referral` - Referral codes and credited referrals
//! - `reward` - Per-track reward state
//! - `status` - MembershipStatus state machine

mod aggregate;
mod cycle;
mod errors;
mod plan;
mod referral;
mod reward;
mod status;

pub use aggregate::{Membership, MilestoneOutcome};
pub use cycle::CycleSnapshot;
pub use errors::MembershipError;
pub use plan::{Plan, LEGACY_DEFAULT_PLAN, MAX_REFERRAL_GOAL};
pub use referral::{Referral, ReferralCode, ReferralKind, ReferredParty};
pub use reward::RewardState;
pub use status::MembershipStatus;
