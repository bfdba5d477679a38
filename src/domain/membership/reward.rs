//! Per-track reward state.
//!
//! Each cycle carries one `RewardState` for the money-back track and one for
//! the gold coin track. The claim workflow drives the state; the membership
//! only reads it to decide renewal eligibility.

use serde::{Deserialize, Serialize};

use crate::domain::claim::ClaimStatus;

/// Progress of one reward track within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardState {
    /// Not claimed yet (or the last claim was rejected).
    NotClaimed,

    /// A claim was submitted and waits for an admin.
    PendingAdmin,

    /// An admin is processing the claim.
    InProgress,

    /// Reward handed over, or the track is disabled for the plan.
    Fulfilled,
}

impl RewardState {
    /// Starting state for a track; disabled tracks are satisfied up front so
    /// they never hold back renewal.
    pub fn initial(track_enabled: bool) -> Self {
        if track_enabled {
            RewardState::NotClaimed
        } else {
            RewardState::Fulfilled
        }
    }

    /// State a track takes when its claim moves to `status`.
    pub fn from_claim_status(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Pending => RewardState::PendingAdmin,
            ClaimStatus::InProgress => RewardState::InProgress,
            ClaimStatus::Completed => RewardState::Fulfilled,
            ClaimStatus::Rejected => RewardState::NotClaimed,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        matches!(self, RewardState::Fulfilled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RewardState::NotClaimed => "not_claimed",
            RewardState::PendingAdmin => "pending_admin",
            RewardState::InProgress => "in_progress",
            RewardState::Fulfilled => "fulfilled",
        }
    }

    /// Parses the stored form, accepting the legacy boolean spellings.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "not_claimed" | "false" => Some(RewardState::NotClaimed),
            "pending_admin" => Some(RewardState::PendingAdmin),
            "in_progress" => Some(RewardState::InProgress),
            "fulfilled" | "true" => Some(RewardState::Fulfilled),
            _ => None,
        }
    }
}

impl std::fmt::Display for RewardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_track_starts_fulfilled() {
        assert_eq!(RewardState::initial(false), RewardState::Fulfilled);
        assert_eq!(RewardState::initial(true), RewardState::NotClaimed);
    }

    #[test]
    fn claim_statuses_project_onto_track() {
        assert_eq!(
            RewardState::from_claim_status(ClaimStatus::Pending),
            RewardState::PendingAdmin
        );
        assert_eq!(
            RewardState::from_claim_status(ClaimStatus::InProgress),
            RewardState::InProgress
        );
        assert_eq!(
            RewardState::from_claim_status(ClaimStatus::Completed),
            RewardState::Fulfilled
        );
        assert_eq!(
            RewardState::from_claim_status(ClaimStatus::Rejected),
            RewardState::NotClaimed
        );
    }

    #[test]
    fn only_fulfilled_counts() {
        assert!(RewardState::Fulfilled.is_fulfilled());
        assert!(!RewardState::PendingAdmin.is_fulfilled());
        assert!(!RewardState::InProgress.is_fulfilled());
    }

    #[test]
    fn parse_accepts_legacy_booleans() {
        assert_eq!(RewardState::parse("true"), Some(RewardState::Fulfilled));
        assert_eq!(RewardState::parse("false"), Some(RewardState::NotClaimed));
        assert_eq!(RewardState::parse("pending_admin"), Some(RewardState::PendingAdmin));
        assert_eq!(RewardState::parse("maybe"), None);
    }
}
