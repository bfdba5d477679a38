//! MembershipRequest entity.
//!
//! A payment submission waiting for an admin decision. The payment proof is
//! an opaque reference supplied by the storefront; nothing here inspects it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Email, MembershipRequestId, StateMachine, Timestamp};
use crate::domain::membership::{MembershipError, ReferralCode};

use super::RequestStatus;

/// Input for a new membership request.
#[derive(Debug, Clone)]
pub struct NewMembershipRequest {
    pub name: String,
    pub email: Email,
    pub mobile: String,
    pub referral_code: Option<String>,
    pub plan_id: Option<String>,
    pub screenshot_url: Option<String>,
}

/// A membership purchase awaiting review.
///
/// Terminal once approved or rejected; only the decision timestamp changes
/// on that transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub id: MembershipRequestId,

    pub name: String,

    pub email: Email,

    pub mobile: String,

    /// Referral code typed in by the purchaser, normalized.
    #[serde(default)]
    pub referral_code: Option<String>,

    #[serde(default)]
    pub plan_id: Option<String>,

    #[serde(default)]
    pub screenshot_url: Option<String>,

    pub status: RequestStatus,

    pub submitted_at: Timestamp,

    #[serde(default)]
    pub approved_at: Option<Timestamp>,

    #[serde(default)]
    pub rejected_at: Option<Timestamp>,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MembershipRequest {
    /// Validates input and creates a pending request.
    pub fn submit(input: NewMembershipRequest) -> Result<Self, MembershipError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(MembershipError::validation("name", "name is required"));
        }
        let mobile = input.mobile.trim();
        if mobile.is_empty() {
            return Err(MembershipError::validation("mobile", "mobile is required"));
        }

        Ok(Self {
            id: MembershipRequestId::new(),
            name: name.to_string(),
            email: input.email,
            mobile: mobile.to_string(),
            referral_code: blank_to_none(input.referral_code)
                .map(|code| ReferralCode::normalize(&code)),
            plan_id: blank_to_none(input.plan_id),
            screenshot_url: blank_to_none(input.screenshot_url),
            status: RequestStatus::Pending,
            submitted_at: Timestamp::now(),
            approved_at: None,
            rejected_at: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Marks the request approved.
    ///
    /// # Errors
    ///
    /// `RequestAlreadyDecided` if approved or rejected before.
    pub fn approve(&mut self) -> Result<(), MembershipError> {
        self.decide(RequestStatus::Approved)?;
        self.approved_at = Some(Timestamp::now());
        Ok(())
    }

    /// Marks the request rejected.
    pub fn reject(&mut self) -> Result<(), MembershipError> {
        self.decide(RequestStatus::Rejected)?;
        self.rejected_at = Some(Timestamp::now());
        Ok(())
    }

    fn decide(&mut self, target: RequestStatus) -> Result<(), MembershipError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| MembershipError::request_already_decided(self.id, self.status.as_str()))?;
        Ok(())
    }
}
