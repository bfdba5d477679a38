//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - axum routes, DTOs, and the JSON error envelope
//! - `memory` - In-memory stores for tests and database-less runs
//! - `notify` - Resend email delivery and log-only notifications
//! - `plans` - Built-in and YAML plan catalogs
//! - `postgres` - sqlx repositories

pub mod http;
pub mod memory;
pub mod notify;
pub mod plans;
pub mod postgres;

pub use http::{membership_router, MembershipAppState};
