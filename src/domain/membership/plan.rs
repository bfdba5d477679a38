//! Membership plan definitions.
//!
//! A plan decides which reward tracks a cycle offers and how many referrals
//! each track needs. Memberships copy the plan terms when a cycle starts, so
//! later edits to the catalog never rewrite a cycle already in flight.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::claim::RewardType;
use crate::domain::foundation::ValidationError;

/// Upper bound accepted for any referral goal.
pub const MAX_REFERRAL_GOAL: u32 = 1_000;

/// Plan used for requests that name no plan, or a plan the catalog no longer has.
pub static LEGACY_DEFAULT_PLAN: Lazy<Plan> = Lazy::new(|| Plan {
    id: "default".to_string(),
    name: "Member".to_string(),
    cashback_enabled: true,
    cashback_goal: default_cashback_goal(),
    gold_enabled: true,
    gold_goal: default_gold_goal(),
});

/// A membership plan with its two reward tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,

    pub name: String,

    #[serde(default = "default_enabled")]
    pub cashback_enabled: bool,

    /// Referrals needed for the money-back reward.
    #[serde(default = "default_cashback_goal")]
    pub cashback_goal: u32,

    #[serde(default = "default_enabled")]
    pub gold_enabled: bool,

    /// Referrals needed for the gold coin reward.
    #[serde(default = "default_gold_goal")]
    pub gold_goal: u32,
}

impl Plan {
    /// Referral count that completes a cycle.
    ///
    /// The gold track is the later milestone, so it gates completion whenever
    /// it is enabled; otherwise the cashback goal does.
    pub fn completion_goal(&self) -> u32 {
        if self.gold_enabled {
            self.gold_goal
        } else {
            self.cashback_goal
        }
    }

    pub fn offers(&self, reward: RewardType) -> bool {
        match reward {
            RewardType::Cashback => self.cashback_enabled,
            RewardType::Gold => self.gold_enabled,
        }
    }

    /// Checks identifiers and goal bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::empty_field("plan.id"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("plan.name"));
        }
        for (field, goal) in [
            ("plan.cashbackGoal", self.cashback_goal),
            ("plan.goldGoal", self.gold_goal),
        ] {
            if goal == 0 || goal > MAX_REFERRAL_GOAL {
                return Err(ValidationError::out_of_range(
                    field,
                    1,
                    i64::from(MAX_REFERRAL_GOAL),
                    i64::from(goal),
                ));
            }
        }
        Ok(())
    }
}

fn default_enabled() -> bool {
    true
}

fn default_cashback_goal() -> u32 {
    5
}

fn default_gold_goal() -> u32 {
    7
}
