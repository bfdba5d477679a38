//! Membership request domain module.
//!
//! - `request` - MembershipRequest entity (a purchase awaiting admin review)
//! - `status` - RequestStatus state machine

#[allow(clippy::module_inception)]
mod request;
mod status;

pub use request::{MembershipRequest, NewMembershipRequest};
pub use status::RequestStatus;
