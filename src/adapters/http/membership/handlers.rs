//! HTTP handlers for membership endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.
//! Degraded side effects are logged by the application layer and never change
//! the response.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::claim::{
    ListRewardClaimsHandler, SubmitRewardClaimCommand, SubmitRewardClaimHandler,
    UpdateClaimStatusCommand, UpdateClaimStatusHandler,
};
use crate::application::handlers::membership::{
    CreditReferralCommand, CreditReferralHandler, CycleRollover, GetMembershipHandler,
    GetMembershipQuery, ListMembershipsHandler, ReferralCreditor, RenewMembershipCommand,
    RenewMembershipHandler,
};
use crate::application::handlers::request::{
    ApproveMembershipRequestCommand, ApproveMembershipRequestHandler, GetPendingRequestHandler,
    GetPendingRequestQuery, ListMembershipRequestsHandler, RejectMembershipRequestCommand,
    RejectMembershipRequestHandler, SubmitMembershipRequestCommand,
    SubmitMembershipRequestHandler,
};
use crate::domain::foundation::{DomainError, MembershipRequestId, RewardClaimId, Timestamp};
use crate::domain::membership::MembershipError;
use crate::ports::{
    MemberDirectory, MembershipRepository, MembershipRequestRepository, Notifier, PlanCatalog,
    RewardClaimRepository,
};

use super::dto::{
    ApproveRequestResponse, CreditReferralBody, ErrorResponse, HealthResponse,
    RenewMembershipBody, RenewMembershipResponse, SubmitMembershipRequestBody,
    SubmitRewardClaimBody, UpdateClaimStatusBody,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; everything inside is Arc-wrapped.
#[derive(Clone)]
pub struct MembershipAppState {
    pub memberships: Arc<dyn MembershipRepository>,
    pub requests: Arc<dyn MembershipRequestRepository>,
    pub claims: Arc<dyn RewardClaimRepository>,
    pub plans: Arc<dyn PlanCatalog>,
    pub directory: Arc<dyn MemberDirectory>,
    pub notifier: Arc<dyn Notifier>,
    creditor: Arc<ReferralCreditor>,
    rollover: Arc<CycleRollover>,
}

impl MembershipAppState {
    pub fn new(
        memberships: Arc<dyn MembershipRepository>,
        requests: Arc<dyn MembershipRequestRepository>,
        claims: Arc<dyn RewardClaimRepository>,
        plans: Arc<dyn PlanCatalog>,
        directory: Arc<dyn MemberDirectory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let creditor = Arc::new(ReferralCreditor::new(memberships.clone(), directory.clone()));
        let rollover = Arc::new(CycleRollover::new(memberships.clone()));
        Self {
            memberships,
            requests,
            claims,
            plans,
            directory,
            notifier,
            creditor,
            rollover,
        }
    }

    /// Create handlers on demand from the shared state.
    pub fn submit_request_handler(&self) -> SubmitMembershipRequestHandler {
        SubmitMembershipRequestHandler::new(
            self.requests.clone(),
            self.memberships.clone(),
            self.notifier.clone(),
        )
    }

    pub fn approve_request_handler(&self) -> ApproveMembershipRequestHandler {
        ApproveMembershipRequestHandler::new(
            self.requests.clone(),
            self.memberships.clone(),
            self.plans.clone(),
            self.directory.clone(),
            self.notifier.clone(),
            self.creditor.clone(),
            self.rollover.clone(),
        )
    }

    pub fn reject_request_handler(&self) -> RejectMembershipRequestHandler {
        RejectMembershipRequestHandler::new(self.requests.clone())
    }

    pub fn list_requests_handler(&self) -> ListMembershipRequestsHandler {
        ListMembershipRequestsHandler::new(self.requests.clone())
    }

    pub fn pending_request_handler(&self) -> GetPendingRequestHandler {
        GetPendingRequestHandler::new(self.requests.clone())
    }

    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.memberships.clone())
    }

    pub fn list_memberships_handler(&self) -> ListMembershipsHandler {
        ListMembershipsHandler::new(self.memberships.clone())
    }

    pub fn credit_referral_handler(&self) -> CreditReferralHandler {
        CreditReferralHandler::new(self.creditor.clone())
    }

    pub fn renew_handler(&self) -> RenewMembershipHandler {
        RenewMembershipHandler::new(
            self.memberships.clone(),
            self.plans.clone(),
            self.directory.clone(),
            self.rollover.clone(),
        )
    }

    pub fn submit_claim_handler(&self) -> SubmitRewardClaimHandler {
        SubmitRewardClaimHandler::new(
            self.claims.clone(),
            self.memberships.clone(),
            self.notifier.clone(),
        )
    }

    pub fn update_claim_status_handler(&self) -> UpdateClaimStatusHandler {
        UpdateClaimStatusHandler::new(
            self.claims.clone(),
            self.memberships.clone(),
            self.notifier.clone(),
        )
    }

    pub fn list_claims_handler(&self) -> ListRewardClaimsHandler {
        ListRewardClaimsHandler::new(self.claims.clone())
    }
}

fn parse_request_id(raw: &str) -> Result<MembershipRequestId, MembershipError> {
    MembershipRequestId::from_str(raw)
        .map_err(|_| MembershipError::validation("id", "request id must be a UUID"))
}

fn parse_claim_id(raw: &str) -> Result<RewardClaimId, MembershipError> {
    RewardClaimId::from_str(raw)
        .map_err(|_| MembershipError::validation("id", "claim id must be a UUID"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/health
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        timestamp: Timestamp::now().to_rfc3339(),
    })
}

/// GET /api/memberships/requests - All membership requests (admin)
pub async fn list_requests(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let requests = state.list_requests_handler().handle().await?;
    Ok(Json(requests))
}

/// GET /api/memberships - All memberships (admin)
pub async fn list_memberships(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let memberships = state.list_memberships_handler().handle().await?;
    Ok(Json(memberships))
}

/// GET /api/memberships/user/:email - Membership for an email, or null
pub async fn get_membership(
    State(state): State<MembershipAppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let membership = state
        .get_membership_handler()
        .handle(GetMembershipQuery { email })
        .await?;
    Ok(Json(membership))
}

/// GET /api/memberships/request/:email - Pending request for an email, or null
pub async fn get_pending_request(
    State(state): State<MembershipAppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let request = state
        .pending_request_handler()
        .handle(GetPendingRequestQuery { email })
        .await?;
    Ok(Json(request))
}

/// GET /api/memberships/claims - All reward claims, newest first (admin)
pub async fn list_claims(
    State(state): State<MembershipAppState>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let claims = state.list_claims_handler().handle().await?;
    Ok(Json(claims))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/memberships/request - Submit a membership payment for review
pub async fn submit_request(
    State(state): State<MembershipAppState>,
    JsonBody(body): JsonBody<SubmitMembershipRequestBody>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = SubmitMembershipRequestCommand {
        name: body.name,
        email: body.email,
        mobile: body.mobile,
        referral_code: body.referral_code,
        plan_id: body.plan_id,
        screenshot_url: body.screenshot_url,
    };

    let result = state.submit_request_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(result.request)))
}

/// PUT /api/memberships/request/:id/approve - Activate or renew (admin)
pub async fn approve_request(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = ApproveMembershipRequestCommand {
        id: parse_request_id(&id)?,
    };

    let result = state.approve_request_handler().handle(cmd).await?;
    Ok(Json(ApproveRequestResponse {
        membership: result.membership,
        request: result.request,
    }))
}

/// PUT /api/memberships/request/:id/reject - Refuse a payment (admin)
pub async fn reject_request(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = RejectMembershipRequestCommand {
        id: parse_request_id(&id)?,
    };

    let request = state.reject_request_handler().handle(cmd).await?;
    Ok(Json(request))
}

/// POST /api/memberships/referral - Credit a registration to a referral code
pub async fn credit_referral(
    State(state): State<MembershipAppState>,
    JsonBody(body): JsonBody<CreditReferralBody>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = CreditReferralCommand {
        referral_code: body.referral_code,
        referred_name: body.referred_user_name,
        email: body.referred_user_email,
        mobile: body.referred_user_mobile,
    };

    let result = state.credit_referral_handler().handle(cmd).await?;
    Ok(Json(result.membership))
}

/// POST /api/memberships/renew - Start the next cycle once both rewards are fulfilled
pub async fn renew_membership(
    State(state): State<MembershipAppState>,
    JsonBody(body): JsonBody<RenewMembershipBody>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = RenewMembershipCommand {
        email: body.email,
        plan_id: body.plan_id,
    };

    let result = state.renew_handler().handle(cmd).await?;
    let message = format!(
        "Membership renewed. Cycle {} started with referral code {}",
        result.membership.cycle_number(),
        result.membership.referral_code
    );
    Ok(Json(RenewMembershipResponse {
        success: true,
        membership: result.membership,
        message,
    }))
}

/// POST /api/memberships/claim - Submit a reward claim
pub async fn submit_claim(
    State(state): State<MembershipAppState>,
    JsonBody(body): JsonBody<SubmitRewardClaimBody>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = SubmitRewardClaimCommand {
        email: body.email,
        name: body.name,
        mobile: body.mobile,
        membership_id: body.membership_id,
        details: body.details,
    };

    let result = state.submit_claim_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(result.claim)))
}

/// PUT /api/memberships/claim/:id/status - Move a claim through its workflow (admin)
pub async fn update_claim_status(
    State(state): State<MembershipAppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateClaimStatusBody>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let cmd = UpdateClaimStatusCommand {
        id: parse_claim_id(&id)?,
        status: body.status,
    };

    let result = state.update_claim_status_handler().handle(cmd).await?;
    Ok(Json(result.claim))
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractors
// ════════════════════════════════════════════════════════════════════════════════

/// JSON request body whose rejections use the API error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(MembershipApiError))]
pub struct JsonBody<T>(pub T);

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub struct MembershipApiError(MembershipError);

impl From<MembershipError> for MembershipApiError {
    fn from(err: MembershipError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for MembershipApiError {
    fn from(err: DomainError) -> Self {
        Self(MembershipError::from(err))
    }
}

impl From<JsonRejection> for MembershipApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(MembershipError::validation("body", rejection.body_text()))
    }
}

impl MembershipApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            MembershipError::NotFound(_)
            | MembershipError::RequestNotFound(_)
            | MembershipError::ClaimNotFound(_)
            | MembershipError::ReferralCodeNotFound(_)
            | MembershipError::ReferralBlocked(_) => StatusCode::NOT_FOUND,
            MembershipError::ActiveMembershipExists(_)
            | MembershipError::CycleIncomplete(_)
            | MembershipError::RequestAlreadyDecided { .. }
            | MembershipError::InvalidState { .. }
            | MembershipError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            MembershipError::Conflict(_) => StatusCode::CONFLICT,
            MembershipError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MembershipApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Membership request failed");
        }

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
