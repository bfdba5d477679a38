//! HTTP adapter for membership endpoints.
//!
//! Exposes the membership reward engine via REST API under `/api/memberships`,
//! plus `GET /api/health`.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{MembershipApiError, MembershipAppState};
pub use routes::{membership_router, membership_routes};
