//! PostgreSQL implementation of MembershipRepository.
//!
//! Plan terms and reward tracks are scalar columns; the current cycle's
//! referrals and the archived history are JSONB. The referral-code lookup
//! goes through the unique `referral_code_key` column.

use crate::domain::foundation::{DomainError, Email, ErrorCode, Timestamp};
use crate::domain::membership::{
    CycleSnapshot, Membership, MembershipStatus, Plan, Referral, ReferralCode, RewardState,
};
use crate::ports::MembershipRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

const REFERRAL_CODE_CONSTRAINT: &str = "memberships_referral_code_key_key";
const PRIMARY_KEY_CONSTRAINT: &str = "memberships_pkey";

const SELECT_COLUMNS: &str = r#"
    SELECT email, name, mobile,
           plan_id, plan_name, cashback_enabled, cashback_goal, gold_enabled, gold_goal,
           referral_code, referral_count, referrals,
           money_back_claimed, gold_coin_claimed, status,
           activated_at, completed_at, history, renewal_count, version
    FROM memberships
"#;

/// PostgreSQL implementation of the MembershipRepository port.
pub struct PostgresMembershipRepository {
    pool: PgPool,
}

impl PostgresMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a membership.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    email: String,
    name: String,
    mobile: String,
    plan_id: String,
    plan_name: String,
    cashback_enabled: bool,
    cashback_goal: i32,
    gold_enabled: bool,
    gold_goal: i32,
    referral_code: String,
    referral_count: i32,
    referrals: Json<Vec<Referral>>,
    money_back_claimed: String,
    gold_coin_claimed: String,
    status: String,
    activated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    history: Json<Vec<CycleSnapshot>>,
    renewal_count: i32,
    version: i64,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            email: Email::new(&row.email).map_err(|e| corrupt("email", e))?,
            name: row.name,
            mobile: row.mobile,
            plan: Plan {
                id: row.plan_id,
                name: row.plan_name,
                cashback_enabled: row.cashback_enabled,
                cashback_goal: to_u32("cashback_goal", row.cashback_goal)?,
                gold_enabled: row.gold_enabled,
                gold_goal: to_u32("gold_goal", row.gold_goal)?,
            },
            referral_code: ReferralCode::new(&row.referral_code)
                .map_err(|e| corrupt("referral_code", e))?,
            referral_count: to_u32("referral_count", row.referral_count)?,
            referrals: row.referrals.0,
            money_back_claimed: parse_reward_state(&row.money_back_claimed)?,
            gold_coin_claimed: parse_reward_state(&row.gold_coin_claimed)?,
            status: parse_status(&row.status)?,
            activated_at: Timestamp::from_datetime(row.activated_at),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
            history: row.history.0,
            renewal_count: to_u32("renewal_count", row.renewal_count)?,
            version: u64::try_from(row.version).map_err(|e| corrupt("version", e))?,
        })
    }
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, err),
    )
}

fn to_u32(column: &str, value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|e| corrupt(column, e))
}

fn to_i32(column: &str, value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|e| corrupt(column, e))
}

fn to_i64(value: u64) -> Result<i64, DomainError> {
    i64::try_from(value).map_err(|e| corrupt("version", e))
}

fn parse_status(s: &str) -> Result<MembershipStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "active" => Ok(MembershipStatus::Active),
        "completed" => Ok(MembershipStatus::Completed),
        _ => Err(corrupt("status", s)),
    }
}

fn parse_reward_state(s: &str) -> Result<RewardState, DomainError> {
    RewardState::parse(s).ok_or_else(|| corrupt("reward state", s))
}

fn map_write_error(membership: &Membership, action: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some(REFERRAL_CODE_CONSTRAINT) => {
                return DomainError::conflict(membership.referral_code.as_str())
            }
            Some(PRIMARY_KEY_CONSTRAINT) => return DomainError::conflict(membership.email.as_str()),
            _ => {}
        }
    }
    DomainError::database(format!("Failed to {} membership: {}", action, e))
}

#[async_trait]
impl MembershipRepository for PostgresMembershipRepository {
    async fn insert(&self, membership: &Membership) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO memberships (
                email, name, mobile,
                plan_id, plan_name, cashback_enabled, cashback_goal, gold_enabled, gold_goal,
                referral_code, referral_code_key, referral_count, referrals,
                money_back_claimed, gold_coin_claimed, status,
                activated_at, completed_at, history, renewal_count, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                      $14, $15, $16, $17, $18, $19, $20, $21)
            "#,
        )
        .bind(membership.email.as_str())
        .bind(&membership.name)
        .bind(&membership.mobile)
        .bind(&membership.plan.id)
        .bind(&membership.plan.name)
        .bind(membership.plan.cashback_enabled)
        .bind(to_i32("cashback_goal", membership.plan.cashback_goal)?)
        .bind(membership.plan.gold_enabled)
        .bind(to_i32("gold_goal", membership.plan.gold_goal)?)
        .bind(membership.referral_code.as_str())
        .bind(membership.referral_code.key())
        .bind(to_i32("referral_count", membership.referral_count)?)
        .bind(Json(&membership.referrals))
        .bind(membership.money_back_claimed.as_str())
        .bind(membership.gold_coin_claimed.as_str())
        .bind(membership.status.as_str())
        .bind(membership.activated_at.as_datetime())
        .bind(membership.completed_at.as_ref().map(|t| *t.as_datetime()))
        .bind(Json(&membership.history))
        .bind(to_i32("renewal_count", membership.renewal_count)?)
        .bind(to_i64(membership.version)?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(membership, "save", e))?;

        Ok(())
    }

    async fn update(&self, membership: &mut Membership) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE memberships SET
                name = $3,
                mobile = $4,
                plan_id = $5,
                plan_name = $6,
                cashback_enabled = $7,
                cashback_goal = $8,
                gold_enabled = $9,
                gold_goal = $10,
                referral_code = $11,
                referral_code_key = $12,
                referral_count = $13,
                referrals = $14,
                money_back_claimed = $15,
                gold_coin_claimed = $16,
                status = $17,
                activated_at = $18,
                completed_at = $19,
                history = $20,
                renewal_count = $21,
                version = version + 1
            WHERE email = $1 AND version = $2
            "#,
        )
        .bind(membership.email.as_str())
        .bind(to_i64(membership.version)?)
        .bind(&membership.name)
        .bind(&membership.mobile)
        .bind(&membership.plan.id)
        .bind(&membership.plan.name)
        .bind(membership.plan.cashback_enabled)
        .bind(to_i32("cashback_goal", membership.plan.cashback_goal)?)
        .bind(membership.plan.gold_enabled)
        .bind(to_i32("gold_goal", membership.plan.gold_goal)?)
        .bind(membership.referral_code.as_str())
        .bind(membership.referral_code.key())
        .bind(to_i32("referral_count", membership.referral_count)?)
        .bind(Json(&membership.referrals))
        .bind(membership.money_back_claimed.as_str())
        .bind(membership.gold_coin_claimed.as_str())
        .bind(membership.status.as_str())
        .bind(membership.activated_at.as_datetime())
        .bind(membership.completed_at.as_ref().map(|t| *t.as_datetime()))
        .bind(Json(&membership.history))
        .bind(to_i32("renewal_count", membership.renewal_count)?)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(membership, "update", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::conflict(membership.email.as_str()));
        }

        membership.version += 1;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> =
            sqlx::query_as(&format!("{} WHERE email = $1", SELECT_COLUMNS))
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find membership: {}", e)))?;

        row.map(Membership::try_from).transpose()
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<Membership>, DomainError> {
        let key = ReferralCode::normalize(code);
        if key.is_empty() {
            return Ok(None);
        }

        let row: Option<MembershipRow> =
            sqlx::query_as(&format!("{} WHERE referral_code_key = $1", SELECT_COLUMNS))
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to find membership: {}", e)))?;

        row.map(Membership::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> =
            sqlx::query_as(&format!("{} ORDER BY activated_at DESC", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to list memberships: {}", e)))?;

        rows.into_iter().map(Membership::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_works_for_all_values() {
        assert_eq!(parse_status("active").unwrap(), MembershipStatus::Active);
        assert_eq!(parse_status("COMPLETED").unwrap(), MembershipStatus::Completed);
        assert!(parse_status("expired").is_err());
    }

    #[test]
    fn reward_state_round_trips_through_column_text() {
        for state in [
            RewardState::NotClaimed,
            RewardState::PendingAdmin,
            RewardState::InProgress,
            RewardState::Fulfilled,
        ] {
            assert_eq!(parse_reward_state(state.as_str()).unwrap(), state);
        }
        assert_eq!(parse_reward_state("true").unwrap(), RewardState::Fulfilled);
        assert!(parse_reward_state("").is_err());
    }

    #[test]
    fn negative_counters_are_rejected() {
        let err = to_u32("referral_count", -1).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("referral_count"));
    }
}
