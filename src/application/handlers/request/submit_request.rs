//! SubmitMembershipRequestHandler - Records a membership payment for review.

use std::sync::Arc;

use crate::domain::foundation::Email;
use crate::domain::membership::MembershipError;
use crate::domain::request::{MembershipRequest, NewMembershipRequest};
use crate::ports::{MembershipRepository, MembershipRequestRepository, Notifier};

use super::super::effects::{dispatch_notification, NotificationKind};

#[derive(Debug, Clone)]
pub struct SubmitMembershipRequestCommand {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub referral_code: Option<String>,
    pub plan_id: Option<String>,
    /// Opaque reference to the uploaded payment proof.
    pub screenshot_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubmitMembershipRequestResult {
    pub request: MembershipRequest,
}

/// Handler for new membership requests.
///
/// A member whose current cycle still has an unfulfilled reward cannot buy
/// the next cycle yet.
pub struct SubmitMembershipRequestHandler {
    requests: Arc<dyn MembershipRequestRepository>,
    memberships: Arc<dyn MembershipRepository>,
    notifier: Arc<dyn Notifier>,
}

impl SubmitMembershipRequestHandler {
    pub fn new(
        requests: Arc<dyn MembershipRequestRepository>,
        memberships: Arc<dyn MembershipRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests,
            memberships,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitMembershipRequestCommand,
    ) -> Result<SubmitMembershipRequestResult, MembershipError> {
        let email = Email::new(&cmd.email)?;
        let request = MembershipRequest::submit(NewMembershipRequest {
            name: cmd.name,
            email,
            mobile: cmd.mobile,
            referral_code: cmd.referral_code,
            plan_id: cmd.plan_id,
            screenshot_url: cmd.screenshot_url,
        })?;

        if let Some(existing) = self.memberships.find_by_email(&request.email).await? {
            if !existing.is_fully_claimed() {
                return Err(MembershipError::active_membership_exists(request.email));
            }
        }

        self.requests.save(&request).await?;
        tracing::info!(request_id = %request.id, email = %request.email, plan_id = ?request.plan_id, "Membership request submitted");

        let notifier = self.notifier.clone();
        let received = request.clone();
        dispatch_notification(NotificationKind::MembershipRequestReceived, async move {
            notifier.membership_request_received(&received).await
        });

        Ok(SubmitMembershipRequestResult { request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{Fixture, StalledNotifier};
    use std::time::Duration;
    use crate::domain::request::RequestStatus;

    fn handler(fx: &Fixture) -> SubmitMembershipRequestHandler {
        SubmitMembershipRequestHandler::new(
            fx.requests.clone(),
            fx.memberships.clone(),
            fx.notifier.clone(),
        )
    }

    fn cmd(email: &str) -> SubmitMembershipRequestCommand {
        SubmitMembershipRequestCommand {
            name: "Kavya".to_string(),
            email: email.to_string(),
            mobile: "9000000002".to_string(),
            referral_code: Some("abc123".to_string()),
            plan_id: Some("premium".to_string()),
            screenshot_url: Some("https://blob.example.com/p/1.png".to_string()),
        }
    }

    #[tokio::test]
    async fn new_customer_request_is_pending_and_admin_is_told() {
        let fx = Fixture::new();
        let result = handler(&fx).handle(cmd("kavya@example.com")).await.unwrap();

        assert_eq!(result.request.status, RequestStatus::Pending);
        let stored = fx.requests.find_by_id(&result.request.id).await.unwrap();
        assert!(stored.is_some());
        assert_eq!(fx.notifier.wait_for("admin@example.com", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn blocked_while_current_cycle_has_open_rewards() {
        let fx = Fixture::new();
        fx.member("kavya@example.com", "KAV1234").await;

        let err = handler(&fx)
            .handle(cmd("kavya@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, MembershipError::ActiveMembershipExists(_)));
        assert!(fx.requests.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn allowed_once_both_rewards_are_fulfilled() {
        let fx = Fixture::new();
        fx.member("kavya@example.com", "KAV1234").await;
        fx.fulfil_rewards("kavya@example.com").await;

        assert!(handler(&fx).handle(cmd("kavya@example.com")).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let fx = Fixture::new();
        let err = handler(&fx).handle(cmd("kavya")).await.unwrap_err();
        assert!(matches!(err, MembershipError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_submission() {
        let fx = Fixture::new();
        fx.notifier.set_failing(true);
        let result = handler(&fx).handle(cmd("kavya@example.com")).await.unwrap();
        assert_eq!(result.request.status, RequestStatus::Pending);
        assert!(fx.notifier.sent().await.is_empty());
    }

    #[tokio::test]
    async fn hung_email_provider_does_not_hold_submission() {
        let fx = Fixture::new();
        let handler = SubmitMembershipRequestHandler::new(
            fx.requests.clone(),
            fx.memberships.clone(),
            Arc::new(StalledNotifier),
        );

        let result = tokio::time::timeout(
            Duration::from_millis(500),
            handler.handle(cmd("kavya@example.com")),
        )
        .await
        .expect("submission waited on email delivery")
        .unwrap();
        assert!(fx.requests.find_by_id(&result.request.id).await.unwrap().is_some());
    }
}
