//! HTTP adapters - REST API implementations.

pub mod membership;

pub use membership::{membership_router, MembershipAppState};
