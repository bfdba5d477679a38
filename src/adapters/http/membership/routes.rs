//! Axum router configuration for membership endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    approve_request, credit_referral, get_membership, get_pending_request, health, list_claims,
    list_memberships, list_requests, reject_request, renew_membership, submit_claim,
    submit_request, update_claim_status, MembershipAppState,
};

/// Create the membership API router.
///
/// # Routes
///
/// ## Member Endpoints
/// - `GET /user/:email` - Membership for an email (or null)
/// - `GET /request/:email` - Pending request for an email (or null)
/// - `POST /request` - Submit a membership payment
/// - `POST /referral` - Credit a registration to a referral code
/// - `POST /renew` - Start the next cycle
/// - `POST /claim` - Submit a reward claim
///
/// ## Admin Endpoints
/// - `GET /` - All memberships
/// - `GET /requests` - All requests
/// - `PUT /request/:id/approve` - Approve a request
/// - `PUT /request/:id/reject` - Reject a request
/// - `GET /claims` - All reward claims
/// - `PUT /claim/:id/status` - Update a claim's status
pub fn membership_routes() -> Router<MembershipAppState> {
    Router::new()
        // Member endpoints
        .route("/user/:email", get(get_membership))
        // Shares the `:id` segment with the approve/reject routes; it carries an email here.
        .route("/request/:id", get(get_pending_request))
        .route("/request", post(submit_request))
        .route("/referral", post(credit_referral))
        .route("/renew", post(renew_membership))
        .route("/claim", post(submit_claim))
        // Admin endpoints
        .route("/", get(list_memberships))
        .route("/requests", get(list_requests))
        .route("/request/:id/approve", put(approve_request))
        .route("/request/:id/reject", put(reject_request))
        .route("/claims", get(list_claims))
        .route("/claim/:id/status", put(update_claim_status))
}

/// Create the complete API router, suitable for mounting at the root.
///
/// # Example
///
/// ```ignore
/// let app = membership_router().with_state(state);
/// ```
pub fn membership_router() -> Router<MembershipAppState> {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/memberships", membership_routes())
}
