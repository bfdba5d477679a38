//! RewardClaim entity.
//!
//! A claim is the audit record of one reward request. Claims are appended,
//! never deleted; their terminal status is projected back onto the owning
//! membership's reward track.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Email, RewardClaimId, StateMachine, Timestamp};
use crate::domain::membership::MembershipError;

use super::{ClaimStatus, RewardType};

/// Reward-specific payout or delivery details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClaimDetails {
    /// Refund destination for the money-back reward.
    #[serde(rename_all = "camelCase")]
    Cashback {
        account_holder: String,
        #[serde(default)]
        upi_id: Option<String>,
        #[serde(default)]
        bank_account: Option<String>,
        #[serde(default)]
        ifsc: Option<String>,
    },

    /// Shipping destination for the gold coin.
    #[serde(rename_all = "camelCase")]
    Gold { delivery_address: String },
}

impl ClaimDetails {
    pub fn reward_type(&self) -> RewardType {
        match self {
            ClaimDetails::Cashback { .. } => RewardType::Cashback,
            ClaimDetails::Gold { .. } => RewardType::Gold,
        }
    }

    /// Cashback needs a holder plus a UPI id or bank account; gold needs an address.
    pub fn validate(&self) -> Result<(), MembershipError> {
        match self {
            ClaimDetails::Cashback {
                account_holder,
                upi_id,
                bank_account,
                ..
            } => {
                if account_holder.trim().is_empty() {
                    return Err(MembershipError::validation(
                        "accountHolder",
                        "account holder is required",
                    ));
                }
                let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
                if !has(upi_id) && !has(bank_account) {
                    return Err(MembershipError::validation(
                        "upiId",
                        "a UPI id or bank account is required",
                    ));
                }
                Ok(())
            }
            ClaimDetails::Gold { delivery_address } => {
                if delivery_address.trim().is_empty() {
                    return Err(MembershipError::validation(
                        "deliveryAddress",
                        "delivery address is required",
                    ));
                }
                Ok(())
            }
        }
    }
}

fn first_cycle() -> u32 {
    1
}

/// A member's request for one reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardClaim {
    pub id: RewardClaimId,

    pub email: Email,

    pub name: String,

    pub mobile: String,

    /// Client-supplied membership reference, kept for the audit trail.
    #[serde(default)]
    pub membership_id: Option<String>,

    #[serde(flatten)]
    pub details: ClaimDetails,

    /// Membership cycle the claim was filed against.
    #[serde(default = "first_cycle")]
    pub cycle_number: u32,

    pub status: ClaimStatus,

    pub submitted_at: Timestamp,

    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl RewardClaim {
    /// Creates a pending claim after validating the payload.
    pub fn submit(
        email: Email,
        name: impl Into<String>,
        mobile: impl Into<String>,
        membership_id: Option<String>,
        details: ClaimDetails,
    ) -> Result<Self, MembershipError> {
        let name = name.into();
        let mobile = mobile.into();
        if name.trim().is_empty() {
            return Err(MembershipError::validation("name", "name is required"));
        }
        if mobile.trim().is_empty() {
            return Err(MembershipError::validation("mobile", "mobile is required"));
        }
        details.validate()?;

        Ok(Self {
            id: RewardClaimId::new(),
            email,
            name: name.trim().to_string(),
            mobile: mobile.trim().to_string(),
            membership_id,
            details,
            cycle_number: first_cycle(),
            status: ClaimStatus::Pending,
            submitted_at: Timestamp::now(),
            updated_at: None,
        })
    }

    pub fn reward_type(&self) -> RewardType {
        self.details.reward_type()
    }

    /// Binds the claim to the membership cycle it was accepted into.
    pub fn file_against(&mut self, cycle_number: u32) {
        self.cycle_number = cycle_number;
    }

    /// Whether the claim was filed in cycle `cycle_number`.
    pub fn belongs_to_cycle(&self, cycle_number: u32) -> bool {
        self.cycle_number == cycle_number
    }

    /// Moves the claim to `target`, stamping `updated_at`.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the claim is already completed or rejected.
    pub fn update_status(&mut self, target: ClaimStatus) -> Result<(), MembershipError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            MembershipError::invalid_state(
                format!("claim is {}", self.status),
                format!("move claim to {}", target),
            )
        })?;
        self.updated_at = Some(Timestamp::now());
        Ok(())
    }
}
