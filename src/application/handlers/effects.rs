//! Degraded side effects.
//!
//! Secondary writes (user `is_member` flag, referrer credit) never fail the
//! primary operation. Their failures are logged and handed back to the
//! caller as `DegradedEffect` values.
//!
//! Workflow emails are dispatched onto their own task. The primary operation
//! never waits on delivery, so a failed or hung send is only logged.

use std::future::Future;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::domain::foundation::{DomainError, Email};
use crate::ports::MemberDirectory;

/// Which workflow email a failed notification belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MembershipRequestReceived,
    MembershipApproved,
    RewardClaimSubmitted,
    ClaimStatusChanged,
}

/// A secondary effect that did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DegradedEffect {
    /// The user store's `is_member` flag was not written.
    MemberFlag {
        email: Email,
        is_member: bool,
        reason: String,
    },

    /// The referral code on a request credited nobody.
    ReferralCredit { referral_code: String, reason: String },
}

/// Writes the `is_member` flag, reporting failure instead of raising it.
pub(crate) async fn set_member_flag(
    directory: &dyn MemberDirectory,
    email: &Email,
    is_member: bool,
) -> Option<DegradedEffect> {
    match directory.set_member(email, is_member).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(email = %email, is_member, error = %e, "Could not update member flag");
            Some(DegradedEffect::MemberFlag {
                email: email.clone(),
                is_member,
                reason: e.to_string(),
            })
        }
    }
}

/// Sends a workflow email in the background.
///
/// Delivery errors are logged with the notification kind; nothing is
/// reported back to the request that triggered the email.
pub(crate) fn dispatch_notification<F>(kind: NotificationKind, send: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), DomainError>> + Send + 'static,
{
    tokio::spawn(async move {
        match send.await {
            Ok(()) => tracing::debug!(?kind, "Notification delivered"),
            Err(e) => tracing::warn!(?kind, error = %e, "Notification not delivered"),
        }
    })
}
