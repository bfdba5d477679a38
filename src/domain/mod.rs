//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `membership` - Membership cycles, referral crediting, renewal
//! - `request` - Membership purchase requests awaiting admin review
//! - `claim` - Reward claims and their admin workflow

pub mod claim;
pub mod foundation;
pub mod membership;
pub mod request;
