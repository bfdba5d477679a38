//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers own the write paths (approval, crediting, claims,
//! renewal); query handlers are thin reads over the repositories.

pub mod handlers;

pub use handlers::{
    ApproveMembershipRequestCommand, ApproveMembershipRequestHandler,
    CreditReferralCommand, CreditReferralHandler, DegradedEffect,
    RejectMembershipRequestCommand, RejectMembershipRequestHandler,
    RenewMembershipCommand, RenewMembershipHandler,
    SubmitMembershipRequestCommand, SubmitMembershipRequestHandler,
    SubmitRewardClaimCommand, SubmitRewardClaimHandler,
    UpdateClaimStatusCommand, UpdateClaimStatusHandler,
};
