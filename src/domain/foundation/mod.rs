//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the membership rewards domain.

mod email;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use email::Email;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MembershipRequestId, RewardClaimId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
