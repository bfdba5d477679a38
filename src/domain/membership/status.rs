//! Membership cycle status.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of the member's current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Cycle is collecting referrals.
    Active,

    /// Referral count reached the completion goal.
    /// Rewards may still be outstanding.
    Completed,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            // Goal reached
            (Active, Completed)
            // Rollover into a fresh cycle
                | (Active, Active)
                | (Completed, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            Active => vec![Completed, Active],
            Completed => vec![Active],
        }
    }
}
