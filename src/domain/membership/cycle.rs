//! Archived membership cycles.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{Referral, ReferralCode, RewardState};

/// Snapshot of a finished cycle, written once at rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSnapshot {
    /// 1-based position in the member's history.
    pub cycle_number: u32,
    pub plan_id: String,
    pub referral_code: ReferralCode,
    pub referral_count: u32,
    pub referrals: Vec<Referral>,
    pub money_back_claimed: RewardState,
    pub gold_coin_claimed: RewardState,
    pub activated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}
