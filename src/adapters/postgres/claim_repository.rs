//! PostgreSQL implementation of RewardClaimRepository.
//!
//! Reward-specific details are stored as JSONB tagged with the reward type.

use crate::domain::claim::{ClaimDetails, ClaimStatus, RewardClaim};
use crate::domain::foundation::{DomainError, Email, ErrorCode, RewardClaimId, Timestamp};
use crate::ports::RewardClaimRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, email, name, mobile, membership_id, details, cycle_number, status, submitted_at, updated_at
    FROM reward_claims
"#;

pub struct PostgresRewardClaimRepository {
    pool: PgPool,
}

impl PostgresRewardClaimRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClaimRow {
    id: Uuid,
    email: String,
    name: String,
    mobile: String,
    membership_id: Option<String>,
    details: Json<ClaimDetails>,
    cycle_number: i32,
    status: String,
    submitted_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ClaimRow> for RewardClaim {
    type Error = DomainError;

    fn try_from(row: ClaimRow) -> Result<Self, Self::Error> {
        let status = ClaimStatus::from_str(&row.status).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid claim status: {}", e))
        })?;

        let cycle_number = u32::try_from(row.cycle_number).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid claim cycle: {}", row.cycle_number),
            )
        })?;

        Ok(RewardClaim {
            id: RewardClaimId::from_uuid(row.id),
            email: Email::new(&row.email).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid email: {}", e))
            })?,
            name: row.name,
            mobile: row.mobile,
            membership_id: row.membership_id,
            details: row.details.0,
            cycle_number,
            status,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
            updated_at: row.updated_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl RewardClaimRepository for PostgresRewardClaimRepository {
    async fn save(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        let cycle_number = i32::try_from(claim.cycle_number)
            .map_err(|_| DomainError::database("claim cycle out of range"))?;

        sqlx::query(
            r#"
            INSERT INTO reward_claims (
                id, email, name, mobile, membership_id, reward_type, details,
                cycle_number, status, submitted_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.email.as_str())
        .bind(&claim.name)
        .bind(&claim.mobile)
        .bind(&claim.membership_id)
        .bind(claim.reward_type().as_str())
        .bind(Json(&claim.details))
        .bind(cycle_number)
        .bind(claim.status.as_str())
        .bind(claim.submitted_at.as_datetime())
        .bind(claim.updated_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save claim: {}", e)))?;

        Ok(())
    }

    async fn update(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE reward_claims SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(claim.id.as_uuid())
        .bind(claim.status.as_str())
        .bind(claim.updated_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update claim: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ClaimNotFound, "Claim not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &RewardClaimId) -> Result<Option<RewardClaim>, DomainError> {
        let row: Option<ClaimRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find claim: {}", e)))?;

        row.map(RewardClaim::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<RewardClaim>, DomainError> {
        let rows: Vec<ClaimRow> =
            sqlx::query_as(&format!("{} ORDER BY submitted_at DESC", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to list claims: {}", e)))?;

        rows.into_iter().map(RewardClaim::try_from).collect()
    }
}
