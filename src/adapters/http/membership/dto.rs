//! HTTP DTOs (Data Transfer Objects) for membership endpoints.
//!
//! Request bodies use the storefront's camelCase field names. Responses
//! return domain records as-is: reward tracks serialize as `RewardState`
//! strings (`not_claimed`, `pending_admin`, `in_progress`, `fulfilled`) and
//! the plan terms as a nested `plan` object. Clients reading the legacy
//! boolean `moneyBackClaimed` or flat `planId` fields must map from these.

use serde::{Deserialize, Serialize};

use crate::domain::claim::ClaimDetails;
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /request`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitMembershipRequestBody {
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
    /// Location of the already-uploaded payment screenshot.
    #[serde(default)]
    pub screenshot_url: Option<String>,
}

/// Body of `POST /referral`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditReferralBody {
    pub referral_code: String,
    pub referred_user_name: String,
    #[serde(default)]
    pub referred_user_email: Option<String>,
    #[serde(default)]
    pub referred_user_mobile: Option<String>,
}

/// Body of `POST /renew`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewMembershipBody {
    pub email: String,
    #[serde(default)]
    pub plan_id: Option<String>,
}

/// Body of `POST /claim`.
///
/// `type` selects the reward; the remaining fields depend on it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRewardClaimBody {
    pub email: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub membership_id: Option<String>,
    #[serde(flatten)]
    pub details: ClaimDetails,
}

/// Body of `PUT /claim/:id/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClaimStatusBody {
    pub status: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for an approved membership request.
#[derive(Debug, Clone, Serialize)]
pub struct ApproveRequestResponse {
    pub membership: Membership,
    pub request: MembershipRequest,
}

/// Response for a member-initiated renewal.
#[derive(Debug, Clone, Serialize)]
pub struct RenewMembershipResponse {
    pub success: bool,
    pub membership: Membership,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Standard error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Email;
    use crate::domain::membership::{Plan, ReferralCode};

    #[test]
    fn claim_body_reads_flattened_cashback_details() {
        let body: SubmitRewardClaimBody = serde_json::from_value(serde_json::json!({
            "type": "cashback",
            "email": "meena@example.com",
            "name": "Meena",
            "mobile": "9000000001",
            "membershipId": "m-1",
            "accountHolder": "Meena S",
            "upiId": "meena@okbank"
        }))
        .unwrap();

        assert_eq!(body.membership_id.as_deref(), Some("m-1"));
        assert!(matches!(
            body.details,
            ClaimDetails::Cashback { ref upi_id, .. } if upi_id.as_deref() == Some("meena@okbank")
        ));
    }

    #[test]
    fn claim_body_rejects_unknown_type() {
        let result: Result<SubmitRewardClaimBody, _> = serde_json::from_value(serde_json::json!({
            "type": "silver",
            "email": "meena@example.com",
            "name": "Meena",
            "mobile": "9000000001"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn referral_body_uses_storefront_field_names() {
        let body: CreditReferralBody = serde_json::from_value(serde_json::json!({
            "referralCode": "MEE1234",
            "referredUserName": "Devi"
        }))
        .unwrap();
        assert_eq!(body.referral_code, "MEE1234");
        assert!(body.referred_user_email.is_none());
    }

    #[test]
    fn error_envelope_has_code_and_message() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(json, serde_json::json!({"code": "NOT_FOUND", "message": "gone"}));
    }

    #[test]
    fn membership_response_nests_plan_and_names_track_states() {
        let plan = Plan {
            id: "premium".to_string(),
            name: "Premium".to_string(),
            cashback_enabled: true,
            cashback_goal: 3,
            gold_enabled: false,
            gold_goal: 5,
        };
        let membership = Membership::activate(
            Email::new("meena@example.com").unwrap(),
            "Meena",
            "9000000001",
            &plan,
            ReferralCode::new("MEE1234").unwrap(),
        );

        let json = serde_json::to_value(&membership).unwrap();
        assert_eq!(json["plan"]["id"], "premium");
        assert_eq!(json["plan"]["cashbackGoal"], 3);
        assert_eq!(json["moneyBackClaimed"], "not_claimed");
        assert_eq!(json["goldCoinClaimed"], "fulfilled");
        assert!(json.get("planId").is_none());
    }
}
