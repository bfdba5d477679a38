//! Reward claim status and reward type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// The two reward tracks a membership cycle can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    /// Membership fee refunded to the member.
    Cashback,
    /// Gold coin delivered to the member.
    Gold,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Cashback => "cashback",
            RewardType::Gold => "gold",
        }
    }

    /// Human-readable label used in notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            RewardType::Cashback => "Money Back",
            RewardType::Gold => "Gold Coin",
        }
    }
}

impl fmt::Display for RewardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin workflow status of a reward claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Submitted, not yet looked at.
    Pending,
    /// Admin is processing the payout or delivery.
    InProgress,
    /// Reward handed over. Terminal.
    Completed,
    /// Claim refused; the member may submit a new one. Terminal.
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::InProgress => "in_progress",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Rejected => "rejected",
        }
    }

    /// Whether moving into this status sends the member an update email.
    pub fn notifies_member(&self) -> bool {
        matches!(self, ClaimStatus::InProgress | ClaimStatus::Completed)
    }
}

impl StateMachine for ClaimStatus {
    fn can_transition_to(&self, _target: &Self) -> bool {
        // No forward-only ordering among open states; only the terminal
        // states are closed.
        matches!(self, ClaimStatus::Pending | ClaimStatus::InProgress)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ClaimStatus::*;
        match self {
            Pending | InProgress => vec![Pending, InProgress, Completed, Rejected],
            Completed | Rejected => vec![],
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "in_progress" => Ok(ClaimStatus::InProgress),
            "completed" => Ok(ClaimStatus::Completed),
            "rejected" => Ok(ClaimStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown claim status '{}'", other),
            )),
        }
    }
}

impl FromStr for RewardType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cashback" => Ok(RewardType::Cashback),
            "gold" => Ok(RewardType::Gold),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown reward type '{}'", other),
            )),
        }
    }
}
