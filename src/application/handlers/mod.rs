//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `membership` - Referral crediting, renewal, membership queries
//! - `request` - Membership purchase review
//! - `claim` - Reward claim workflow

pub mod claim;
pub mod effects;
pub mod membership;
pub mod request;

#[cfg(test)]
pub(crate) mod test_support;

pub use claim::{
    ListRewardClaimsHandler, SubmitRewardClaimCommand, SubmitRewardClaimHandler,
    SubmitRewardClaimResult, UpdateClaimStatusCommand, UpdateClaimStatusHandler,
    UpdateClaimStatusResult,
};
pub use effects::{DegradedEffect, NotificationKind};
pub use membership::{
    CreditOutcome, CreditReferralCommand, CreditReferralHandler, CreditReferralResult,
    CycleRollover, GetMembershipHandler, GetMembershipQuery, ListMembershipsHandler,
    ReferralCreditor, RenewMembershipCommand, RenewMembershipHandler, RenewMembershipResult,
};
pub use request::{
    ApproveMembershipRequestCommand, ApproveMembershipRequestHandler,
    ApproveMembershipRequestResult, GetPendingRequestHandler, GetPendingRequestQuery,
    ListMembershipRequestsHandler, RejectMembershipRequestCommand,
    RejectMembershipRequestHandler, SubmitMembershipRequestCommand,
    SubmitMembershipRequestHandler, SubmitMembershipRequestResult,
};
