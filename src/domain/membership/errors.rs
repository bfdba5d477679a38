//! Membership-specific error types.
//!
//! Errors raised by the membership, request, referral, and claim workflows.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound / RequestNotFound / ClaimNotFound | 404 |
//! | ReferralCodeNotFound / ReferralBlocked | 404 |
//! | ActiveMembershipExists | 400 |
//! | CycleIncomplete | 400 |
//! | RequestAlreadyDecided | 400 |
//! | InvalidState | 400 |
//! | ValidationFailed | 400 |
//! | Conflict | 409 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{
    DomainError, Email, ErrorCode, MembershipRequestId, RewardClaimId, ValidationError,
};

/// Membership-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// No membership exists for this email.
    NotFound(Email),

    /// Membership request was not found.
    RequestNotFound(MembershipRequestId),

    /// Reward claim was not found.
    ClaimNotFound(RewardClaimId),

    /// No membership owns this referral code.
    ReferralCodeNotFound(String),

    /// The code's owner cannot take more referrals in its current cycle.
    ReferralBlocked(String),

    /// Email already holds a membership whose rewards are not all claimed.
    ActiveMembershipExists(Email),

    /// Renewal attempted before both reward tracks were fulfilled.
    CycleIncomplete(Email),

    /// Request was already approved or rejected.
    RequestAlreadyDecided {
        id: MembershipRequestId,
        status: String,
    },

    /// Invalid state for the requested operation.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Another writer updated the record first.
    Conflict(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl MembershipError {
    pub fn not_found(email: Email) -> Self {
        MembershipError::NotFound(email)
    }

    pub fn request_not_found(id: MembershipRequestId) -> Self {
        MembershipError::RequestNotFound(id)
    }

    pub fn claim_not_found(id: RewardClaimId) -> Self {
        MembershipError::ClaimNotFound(id)
    }

    pub fn referral_code_not_found(code: impl Into<String>) -> Self {
        MembershipError::ReferralCodeNotFound(code.into())
    }

    pub fn referral_blocked(code: impl Into<String>) -> Self {
        MembershipError::ReferralBlocked(code.into())
    }

    pub fn active_membership_exists(email: Email) -> Self {
        MembershipError::ActiveMembershipExists(email)
    }

    pub fn cycle_incomplete(email: Email) -> Self {
        MembershipError::CycleIncomplete(email)
    }

    pub fn request_already_decided(id: MembershipRequestId, status: impl Into<String>) -> Self {
        MembershipError::RequestAlreadyDecided {
            id,
            status: status.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MembershipError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MembershipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(key: impl Into<String>) -> Self {
        MembershipError::Conflict(key.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MembershipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MembershipError::NotFound(_) => ErrorCode::MembershipNotFound,
            MembershipError::RequestNotFound(_) => ErrorCode::RequestNotFound,
            MembershipError::ClaimNotFound(_) => ErrorCode::ClaimNotFound,
            MembershipError::ReferralCodeNotFound(_) | MembershipError::ReferralBlocked(_) => {
                ErrorCode::ReferralCodeNotFound
            }
            MembershipError::ActiveMembershipExists(_) => ErrorCode::MembershipExists,
            MembershipError::CycleIncomplete(_) => ErrorCode::CycleIncomplete,
            MembershipError::RequestAlreadyDecided { .. } => ErrorCode::RequestAlreadyDecided,
            MembershipError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MembershipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MembershipError::Conflict(_) => ErrorCode::ConcurrentModification,
            MembershipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MembershipError::NotFound(email) => format!("Membership not found for {}", email),
            MembershipError::RequestNotFound(id) => format!("Membership request not found: {}", id),
            MembershipError::ClaimNotFound(id) => format!("Reward claim not found: {}", id),
            MembershipError::ReferralCodeNotFound(code) => {
                format!("Invalid referral code: {}", code)
            }
            MembershipError::ReferralBlocked(code) => {
                format!("Referral code {} is not accepting referrals", code)
            }
            MembershipError::ActiveMembershipExists(email) => format!(
                "{} already has an active membership. Claim both rewards before renewing",
                email
            ),
            MembershipError::CycleIncomplete(email) => format!(
                "Membership for {} must complete its current cycle and claim both rewards before renewal",
                email
            ),
            MembershipError::RequestAlreadyDecided { id, status } => {
                format!("Membership request {} is already {}", id, status)
            }
            MembershipError::InvalidState { current, attempted } => {
                format!("Cannot {} while {}", attempted, current)
            }
            MembershipError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MembershipError::Conflict(key) => {
                format!("Record {} was modified concurrently, retry the request", key)
            }
            MembershipError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True for the 404 family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MembershipError::NotFound(_)
                | MembershipError::RequestNotFound(_)
                | MembershipError::ClaimNotFound(_)
                | MembershipError::ReferralCodeNotFound(_)
                | MembershipError::ReferralBlocked(_)
        )
    }
}

impl std::fmt::Display for MembershipError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MembershipError {}

impl From<DomainError> for MembershipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConcurrentModification => MembershipError::Conflict(
                err.details
                    .get("key")
                    .cloned()
                    .unwrap_or_else(|| err.message.clone()),
            ),
            ErrorCode::ValidationFailed => MembershipError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => MembershipError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for MembershipError {
    fn from(err: ValidationError) -> Self {
        MembershipError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<MembershipError> for DomainError {
    fn from(err: MembershipError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
