//! PostgreSQL implementation of MembershipRequestRepository.

use crate::domain::foundation::{
    DomainError, Email, ErrorCode, MembershipRequestId, Timestamp,
};
use crate::domain::request::{MembershipRequest, RequestStatus};
use crate::ports::MembershipRequestRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, email, mobile, referral_code, plan_id, screenshot_url,
           status, submitted_at, approved_at, rejected_at
    FROM membership_requests
"#;

pub struct PostgresMembershipRequestRepository {
    pool: PgPool,
}

impl PostgresMembershipRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    name: String,
    email: String,
    mobile: String,
    referral_code: Option<String>,
    plan_id: Option<String>,
    screenshot_url: Option<String>,
    status: String,
    submitted_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
}

impl TryFrom<RequestRow> for MembershipRequest {
    type Error = DomainError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let status = RequestStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid request status value: {}", row.status),
            )
        })?;

        Ok(MembershipRequest {
            id: MembershipRequestId::from_uuid(row.id),
            name: row.name,
            email: Email::new(&row.email).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid email: {}", e))
            })?,
            mobile: row.mobile,
            referral_code: row.referral_code,
            plan_id: row.plan_id,
            screenshot_url: row.screenshot_url,
            status,
            submitted_at: Timestamp::from_datetime(row.submitted_at),
            approved_at: row.approved_at.map(Timestamp::from_datetime),
            rejected_at: row.rejected_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl MembershipRequestRepository for PostgresMembershipRequestRepository {
    async fn save(&self, request: &MembershipRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO membership_requests (
                id, name, email, mobile, referral_code, plan_id, screenshot_url,
                status, submitted_at, approved_at, rejected_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(&request.name)
        .bind(request.email.as_str())
        .bind(&request.mobile)
        .bind(&request.referral_code)
        .bind(&request.plan_id)
        .bind(&request.screenshot_url)
        .bind(request.status.as_str())
        .bind(request.submitted_at.as_datetime())
        .bind(request.approved_at.as_ref().map(|t| *t.as_datetime()))
        .bind(request.rejected_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save request: {}", e)))?;

        Ok(())
    }

    async fn update(&self, request: &MembershipRequest) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE membership_requests SET
                status = $2,
                approved_at = $3,
                rejected_at = $4
            WHERE id = $1
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.as_str())
        .bind(request.approved_at.as_ref().map(|t| *t.as_datetime()))
        .bind(request.rejected_at.as_ref().map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update request: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::RequestNotFound,
                "Membership request not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &MembershipRequestId,
    ) -> Result<Option<MembershipRequest>, DomainError> {
        let row: Option<RequestRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find request: {}", e)))?;

        row.map(MembershipRequest::try_from).transpose()
    }

    async fn find_pending_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<MembershipRequest>, DomainError> {
        let row: Option<RequestRow> = sqlx::query_as(&format!(
            "{} WHERE email = $1 AND status = 'pending' ORDER BY submitted_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find request: {}", e)))?;

        row.map(MembershipRequest::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<MembershipRequest>, DomainError> {
        let rows: Vec<RequestRow> =
            sqlx::query_as(&format!("{} ORDER BY submitted_at DESC", SELECT_COLUMNS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to list requests: {}", e)))?;

        rows.into_iter().map(MembershipRequest::try_from).collect()
    }
}
