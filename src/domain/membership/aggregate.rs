//! Membership aggregate entity.
//!
//! One record per member email. The record holds the member's *current*
//! cycle (plan terms, referral code, referrals, reward tracks) plus the
//! archived history of earlier cycles.
//!
//! # Design Decisions
//!
//! - **Plan terms are copied**: a cycle keeps the goals it started with
//! - **One code per cycle**: every activation or rollover issues a new code
//! - **Completion is sticky**: once the goal is reached, further credits never
//!   re-stamp `completed_at`
//! - **Renewal gate**: both reward tracks must be fulfilled before rollover

use serde::{Deserialize, Serialize};

use crate::domain::claim::{ClaimStatus, RewardType};
use crate::domain::foundation::{Email, StateMachine, Timestamp};

use super::{
    CycleSnapshot, MembershipError, MembershipStatus, Plan, Referral, ReferralCode,
    ReferralKind, ReferredParty, RewardState,
};

/// Result of checking a cycle against its completion goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneOutcome {
    /// This evaluation moved the cycle to `Completed`.
    Reached,
    /// Goal not reached yet.
    Pending { remaining: u32 },
    /// Cycle was already completed before this evaluation.
    AlreadyCompleted,
}

/// Membership aggregate - a member's current reward cycle plus history.
///
/// # Invariants
///
/// - `email` is the primary key (one record per member)
/// - `referral_count == referrals.len()` within a cycle
/// - `history[i].cycle_number == i + 1`
/// - `completed_at` is set iff `status == Completed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub email: Email,

    pub name: String,

    pub mobile: String,

    /// Plan terms copied at activation or rollover.
    pub plan: Plan,

    pub referral_code: ReferralCode,

    pub referral_count: u32,

    /// Credited referrals, in arrival order.
    pub referrals: Vec<Referral>,

    pub money_back_claimed: RewardState,

    pub gold_coin_claimed: RewardState,

    pub status: MembershipStatus,

    pub activated_at: Timestamp,

    pub completed_at: Option<Timestamp>,

    /// Archived cycles, oldest first.
    #[serde(default)]
    pub history: Vec<CycleSnapshot>,

    #[serde(default)]
    pub renewal_count: u32,

    /// Optimistic concurrency token, bumped by the repository on each write.
    #[serde(default)]
    pub version: u64,
}

impl Membership {
    /// Starts a first cycle for a new member.
    pub fn activate(
        email: Email,
        name: impl Into<String>,
        mobile: impl Into<String>,
        plan: &Plan,
        referral_code: ReferralCode,
    ) -> Self {
        Self {
            email,
            name: name.into(),
            mobile: mobile.into(),
            plan: plan.clone(),
            referral_code,
            referral_count: 0,
            referrals: Vec::new(),
            money_back_claimed: RewardState::initial(plan.cashback_enabled),
            gold_coin_claimed: RewardState::initial(plan.gold_enabled),
            status: MembershipStatus::Active,
            activated_at: Timestamp::now(),
            completed_at: None,
            history: Vec::new(),
            renewal_count: 0,
            version: 0,
        }
    }

    /// Referral count that completes the current cycle.
    pub fn completion_goal(&self) -> u32 {
        self.plan.completion_goal()
    }

    /// Both reward tracks fulfilled (disabled tracks count as fulfilled).
    pub fn is_fully_claimed(&self) -> bool {
        self.money_back_claimed.is_fulfilled() && self.gold_coin_claimed.is_fulfilled()
    }

    /// 1-based number of the current cycle.
    pub fn cycle_number(&self) -> u32 {
        self.history.len() as u32 + 1
    }

    pub fn reward_state(&self, reward: RewardType) -> RewardState {
        match reward {
            RewardType::Cashback => self.money_back_claimed,
            RewardType::Gold => self.gold_coin_claimed,
        }
    }

    fn set_reward_state(&mut self, reward: RewardType, state: RewardState) {
        match reward {
            RewardType::Cashback => self.money_back_claimed = state,
            RewardType::Gold => self.gold_coin_claimed = state,
        }
    }

    /// Whether this cycle's code may be credited by a referral of `kind`.
    ///
    /// Registrations only count while the cycle is active. Paid memberships
    /// also count after completion, until both rewards are fulfilled.
    pub fn accepts_referral(&self, kind: ReferralKind) -> bool {
        if self.is_fully_claimed() {
            return false;
        }
        match kind {
            ReferralKind::Registration => self.status == MembershipStatus::Active,
            ReferralKind::Membership => matches!(
                self.status,
                MembershipStatus::Active | MembershipStatus::Completed
            ),
        }
    }

    /// Appends a referral and evaluates the completion milestone.
    ///
    /// # Errors
    ///
    /// `ReferralBlocked` when the cycle does not accept referrals of `kind`.
    pub fn credit_referral(
        &mut self,
        party: ReferredParty,
        kind: ReferralKind,
    ) -> Result<MilestoneOutcome, MembershipError> {
        if !self.accepts_referral(kind) {
            return Err(MembershipError::referral_blocked(self.referral_code.as_str()));
        }

        self.referrals.push(Referral::new(party, kind, Timestamp::now()));
        self.referral_count += 1;

        Ok(self.evaluate_milestone())
    }

    /// Moves the cycle to `Completed` the first time the goal is met.
    ///
    /// Idempotent: once completed, `completed_at` is never re-stamped.
    pub fn evaluate_milestone(&mut self) -> MilestoneOutcome {
        if self.status == MembershipStatus::Completed {
            return MilestoneOutcome::AlreadyCompleted;
        }

        let goal = self.completion_goal();
        if self.referral_count < goal {
            return MilestoneOutcome::Pending {
                remaining: goal - self.referral_count,
            };
        }

        self.status = MembershipStatus::Completed;
        self.completed_at = Some(Timestamp::now());
        MilestoneOutcome::Reached
    }

    /// Records a freshly submitted claim on its track.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the plan has no such reward, or the track was
    /// already fulfilled this cycle.
    pub fn begin_claim(&mut self, reward: RewardType) -> Result<(), MembershipError> {
        if !self.plan.offers(reward) {
            return Err(MembershipError::invalid_state(
                format!("plan {} has no {} reward", self.plan.id, reward),
                format!("claim {}", reward),
            ));
        }
        if self.reward_state(reward).is_fulfilled() {
            return Err(MembershipError::invalid_state(
                format!("{} already fulfilled in cycle {}", reward, self.cycle_number()),
                format!("claim {}", reward),
            ));
        }
        self.set_reward_state(reward, RewardState::PendingAdmin);
        Ok(())
    }

    /// Projects a claim's status onto its track.
    pub fn apply_claim_status(&mut self, reward: RewardType, status: ClaimStatus) {
        self.set_reward_state(reward, RewardState::from_claim_status(status));
    }

    /// Archives the current cycle and starts a new one on `plan`.
    ///
    /// Shared by admin approval of a renewal payment and member-initiated
    /// renewal.
    ///
    /// # Errors
    ///
    /// `CycleIncomplete` unless both reward tracks are fulfilled.
    pub fn rollover(
        &mut self,
        plan: &Plan,
        referral_code: ReferralCode,
    ) -> Result<&CycleSnapshot, MembershipError> {
        if !self.is_fully_claimed() {
            return Err(MembershipError::cycle_incomplete(self.email.clone()));
        }
        self.status = self
            .status
            .transition_to(MembershipStatus::Active)
            .map_err(|e| MembershipError::invalid_state(self.status.to_string(), e.to_string()))?;

        let snapshot = CycleSnapshot {
            cycle_number: self.cycle_number(),
            plan_id: self.plan.id.clone(),
            referral_code: std::mem::replace(&mut self.referral_code, referral_code),
            referral_count: self.referral_count,
            referrals: std::mem::take(&mut self.referrals),
            money_back_claimed: self.money_back_claimed,
            gold_coin_claimed: self.gold_coin_claimed,
            activated_at: self.activated_at,
            completed_at: self.completed_at.take(),
        };
        self.history.push(snapshot);

        self.plan = plan.clone();
        self.referral_count = 0;
        self.money_back_claimed = RewardState::initial(plan.cashback_enabled);
        self.gold_coin_claimed = RewardState::initial(plan.gold_enabled);
        self.activated_at = Timestamp::now();
        self.renewal_count += 1;

        Ok(&self.history[self.history.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::LEGACY_DEFAULT_PLAN;
    use proptest::prelude::*;

    fn email() -> Email {
        Email::new("meena@example.com").unwrap()
    }

    fn plan(cashback_enabled: bool, gold_enabled: bool) -> Plan {
        Plan {
            id: "premium".to_string(),
            name: "Premium Member".to_string(),
            cashback_enabled,
            cashback_goal: 5,
            gold_enabled,
            gold_goal: 7,
        }
    }

    fn member(plan: &Plan) -> Membership {
        Membership::activate(
            email(),
            "Meena",
            "9000000001",
            plan,
            ReferralCode::new("ABC123").unwrap(),
        )
    }

    fn party(n: u32) -> ReferredParty {
        ReferredParty::new(format!("Friend {}", n))
    }

    fn fulfil_both(m: &mut Membership) {
        m.apply_claim_status(RewardType::Cashback, ClaimStatus::Completed);
        m.apply_claim_status(RewardType::Gold, ClaimStatus::Completed);
    }

    // Activation

    #[test]
    fn activate_starts_an_empty_active_cycle() {
        let m = member(&plan(true, true));
        assert_eq!(m.status, MembershipStatus::Active);
        assert_eq!(m.referral_count, 0);
        assert!(m.referrals.is_empty());
        assert_eq!(m.money_back_claimed, RewardState::NotClaimed);
        assert_eq!(m.gold_coin_claimed, RewardState::NotClaimed);
        assert_eq!(m.cycle_number(), 1);
        assert_eq!(m.renewal_count, 0);
    }

    #[test]
    fn disabled_tracks_are_vacuously_fulfilled() {
        let m = member(&plan(true, false));
        assert_eq!(m.gold_coin_claimed, RewardState::Fulfilled);
        assert_eq!(m.money_back_claimed, RewardState::NotClaimed);

        let m = member(&plan(false, true));
        assert_eq!(m.money_back_claimed, RewardState::Fulfilled);
    }

    // Crediting and milestones

    #[test]
    fn five_credits_do_not_complete_when_gold_enabled() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..5 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        assert_eq!(m.referral_count, 5);
        assert_eq!(m.status, MembershipStatus::Active);
        assert!(m.completed_at.is_none());
    }

    #[test]
    fn seventh_credit_completes_the_cycle() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..6 {
            let outcome = m.credit_referral(party(n), ReferralKind::Registration).unwrap();
            assert!(matches!(outcome, MilestoneOutcome::Pending { .. }));
        }
        let outcome = m.credit_referral(party(6), ReferralKind::Registration).unwrap();
        assert_eq!(outcome, MilestoneOutcome::Reached);
        assert_eq!(m.referral_count, 7);
        assert_eq!(m.status, MembershipStatus::Completed);
        assert!(m.completed_at.is_some());
    }

    #[test]
    fn cashback_goal_completes_when_gold_disabled() {
        let mut m = member(&plan(true, false));
        for n in 0..4 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        let outcome = m.credit_referral(party(4), ReferralKind::Registration).unwrap();
        assert_eq!(outcome, MilestoneOutcome::Reached);
    }

    #[test]
    fn pending_reports_remaining_referrals() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        let outcome = m.credit_referral(party(0), ReferralKind::Registration).unwrap();
        assert_eq!(outcome, MilestoneOutcome::Pending { remaining: 6 });
    }

    #[test]
    fn completion_is_not_restamped() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..7 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        let first = m.completed_at;

        let outcome = m.credit_referral(party(7), ReferralKind::Membership).unwrap();
        assert_eq!(outcome, MilestoneOutcome::AlreadyCompleted);
        assert_eq!(m.completed_at, first);
        assert_eq!(m.evaluate_milestone(), MilestoneOutcome::AlreadyCompleted);
        assert_eq!(m.completed_at, first);
    }

    #[test]
    fn completed_cycle_rejects_registration_credits() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..7 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        let err = m
            .credit_referral(party(8), ReferralKind::Registration)
            .unwrap_err();
        assert!(matches!(err, MembershipError::ReferralBlocked(_)));
        assert_eq!(m.referral_count, 7);
    }

    #[test]
    fn fully_claimed_cycle_blocks_every_credit() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..7 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        fulfil_both(&mut m);

        for kind in [ReferralKind::Registration, ReferralKind::Membership] {
            assert!(m.credit_referral(party(9), kind).is_err());
        }
        assert_eq!(m.referral_count, 7);
        assert_eq!(m.referrals.len(), 7);
    }

    #[test]
    fn referral_entries_keep_kind_and_order() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.credit_referral(party(1), ReferralKind::Registration).unwrap();
        m.credit_referral(party(2), ReferralKind::Membership).unwrap();
        assert_eq!(m.referrals[0].name, "Friend 1");
        assert_eq!(m.referrals[0].kind, ReferralKind::Registration);
        assert_eq!(m.referrals[1].kind, ReferralKind::Membership);
    }

    // Claim projection

    #[test]
    fn claim_lifecycle_projects_onto_track() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.begin_claim(RewardType::Cashback).unwrap();
        assert_eq!(m.money_back_claimed, RewardState::PendingAdmin);

        m.apply_claim_status(RewardType::Cashback, ClaimStatus::InProgress);
        assert_eq!(m.money_back_claimed, RewardState::InProgress);

        m.apply_claim_status(RewardType::Cashback, ClaimStatus::Completed);
        assert_eq!(m.money_back_claimed, RewardState::Fulfilled);
        assert_eq!(m.gold_coin_claimed, RewardState::NotClaimed);
        assert!(!m.is_fully_claimed());
    }

    #[test]
    fn rejected_claim_reopens_track() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.begin_claim(RewardType::Gold).unwrap();
        m.apply_claim_status(RewardType::Gold, ClaimStatus::Rejected);
        assert_eq!(m.gold_coin_claimed, RewardState::NotClaimed);
    }

    #[test]
    fn fulfilled_track_refuses_another_claim() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.begin_claim(RewardType::Gold).unwrap();
        m.apply_claim_status(RewardType::Gold, ClaimStatus::Completed);

        let err = m.begin_claim(RewardType::Gold).unwrap_err();
        assert!(matches!(err, MembershipError::InvalidState { .. }));
        assert_eq!(m.gold_coin_claimed, RewardState::Fulfilled);
    }

    #[test]
    fn disabled_track_refuses_claims() {
        let mut m = member(&plan(true, false));
        assert!(m.begin_claim(RewardType::Gold).is_err());
        assert_eq!(m.gold_coin_claimed, RewardState::Fulfilled);
    }

    #[test]
    fn open_claim_can_be_filed_twice() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.begin_claim(RewardType::Cashback).unwrap();
        m.begin_claim(RewardType::Cashback).unwrap();
        assert_eq!(m.money_back_claimed, RewardState::PendingAdmin);
    }

    // Rollover

    #[test]
    fn rollover_requires_both_tracks() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.apply_claim_status(RewardType::Cashback, ClaimStatus::Completed);
        let err = m
            .rollover(&LEGACY_DEFAULT_PLAN, ReferralCode::new("NEW1").unwrap())
            .unwrap_err();
        assert!(matches!(err, MembershipError::CycleIncomplete(_)));
        assert!(m.history.is_empty());
        assert_eq!(m.referral_code.as_str(), "ABC123");
    }

    #[test]
    fn rollover_archives_and_resets() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        for n in 0..7 {
            m.credit_referral(party(n), ReferralKind::Registration).unwrap();
        }
        fulfil_both(&mut m);
        let completed_at = m.completed_at;
        let elite = Plan {
            id: "elite".to_string(),
            name: "Elite Member".to_string(),
            cashback_enabled: true,
            cashback_goal: 3,
            gold_enabled: false,
            gold_goal: 5,
        };

        let snapshot = m
            .rollover(&elite, ReferralCode::new("MEEZZ99").unwrap())
            .unwrap()
            .clone();

        assert_eq!(snapshot.cycle_number, 1);
        assert_eq!(snapshot.plan_id, "default");
        assert_eq!(snapshot.referral_code.as_str(), "ABC123");
        assert_eq!(snapshot.referral_count, 7);
        assert_eq!(snapshot.referrals.len(), 7);
        assert_eq!(snapshot.completed_at, completed_at);

        assert_eq!(m.history.len(), 1);
        assert_eq!(m.referral_code.as_str(), "MEEZZ99");
        assert_eq!(m.referral_count, 0);
        assert!(m.referrals.is_empty());
        assert_eq!(m.status, MembershipStatus::Active);
        assert!(m.completed_at.is_none());
        assert_eq!(m.renewal_count, 1);
        assert_eq!(m.plan.id, "elite");
        assert_eq!(m.money_back_claimed, RewardState::NotClaimed);
        assert_eq!(m.gold_coin_claimed, RewardState::Fulfilled);
        assert_eq!(m.cycle_number(), 2);
    }

    #[test]
    fn second_rollover_numbers_cycle_two() {
        let mut m = member(&plan(false, false));
        assert!(m.is_fully_claimed());
        m.rollover(&plan(false, false), ReferralCode::new("C2").unwrap())
            .unwrap();
        let snapshot = m
            .rollover(&plan(false, false), ReferralCode::new("C3").unwrap())
            .unwrap();
        assert_eq!(snapshot.cycle_number, 2);
        assert_eq!(m.renewal_count, 2);
    }

    #[test]
    fn round_trips_through_json() {
        let mut m = member(&LEGACY_DEFAULT_PLAN);
        m.credit_referral(party(1), ReferralKind::Membership).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Membership = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    proptest! {
        #[test]
        fn disabled_tracks_start_fulfilled(cashback_enabled: bool, gold_enabled: bool) {
            let m = member(&plan(cashback_enabled, gold_enabled));
            prop_assert_eq!(m.money_back_claimed.is_fulfilled(), !cashback_enabled);
            prop_assert_eq!(m.gold_coin_claimed.is_fulfilled(), !gold_enabled);
        }

        #[test]
        fn completion_happens_exactly_at_goal(goal in 1u32..20, credits in 0u32..30) {
            let p = Plan { gold_goal: goal, ..plan(true, true) };
            let mut m = member(&p);
            let mut reached = 0;
            for n in 0..credits {
                match m.credit_referral(party(n), ReferralKind::Membership) {
                    Ok(MilestoneOutcome::Reached) => reached += 1,
                    Ok(_) => {}
                    Err(_) => prop_assert!(false, "membership credits stay open until claimed"),
                }
            }
            prop_assert_eq!(reached, u32::from(credits >= goal));
            prop_assert_eq!(m.status == MembershipStatus::Completed, credits >= goal);
            prop_assert_eq!(m.referral_count, credits);
        }
    }
}
