//! Membership handlers and the services shared with request approval.

mod credit_referral;
mod cycle_rollover;
mod get_membership;
mod referral_creditor;
mod renew_membership;

pub use credit_referral::{CreditReferralCommand, CreditReferralHandler, CreditReferralResult};
pub use cycle_rollover::CycleRollover;
pub use get_membership::{GetMembershipHandler, GetMembershipQuery, ListMembershipsHandler};
pub use referral_creditor::{CreditOutcome, ReferralCreditor, MAX_CREDIT_ATTEMPTS};
pub use renew_membership::{RenewMembershipCommand, RenewMembershipHandler, RenewMembershipResult};
