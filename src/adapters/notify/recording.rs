//! Notifier that records messages for test assertions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Notify};

use crate::domain::claim::RewardClaim;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;
use crate::ports::Notifier;

use super::{EmailMessage, MessageComposer};

/// How long `wait_for` waits for background sends to land.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Captures rendered messages instead of sending them.
///
/// `set_failing(true)` makes every send fail after recording nothing, to
/// exercise degraded paths. Sends usually run on a spawned task, so tests
/// read them back through `wait_for`.
pub struct RecordingNotifier {
    composer: MessageComposer,
    sent: Mutex<Vec<EmailMessage>>,
    recorded: Notify,
    failing: AtomicBool,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            composer: MessageComposer::new("Test Store", "admin@example.com"),
            sent: Mutex::new(Vec::new()),
            recorded: Notify::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }

    /// Messages addressed to `to`.
    pub async fn sent_to(&self, to: &str) -> Vec<EmailMessage> {
        self.sent()
            .await
            .into_iter()
            .filter(|m| m.to == to)
            .collect()
    }

    /// Waits until `count` messages to `to` were recorded, or the settle
    /// timeout passes, and returns what arrived.
    pub async fn wait_for(&self, to: &str, count: usize) -> Vec<EmailMessage> {
        let arrived = async {
            loop {
                if self.sent_to(to).await.len() >= count {
                    return;
                }
                self.recorded.notified().await;
            }
        };
        let _ = tokio::time::timeout(SETTLE_TIMEOUT, arrived).await;
        self.sent_to(to).await
    }

    async fn record(&self, message: EmailMessage) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                "simulated delivery failure",
            ));
        }
        self.sent.lock().await.push(message);
        self.recorded.notify_one();
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn membership_request_received(
        &self,
        request: &MembershipRequest,
    ) -> Result<(), DomainError> {
        self.record(self.composer.membership_request_received(request))
            .await
    }

    async fn membership_approved(&self, membership: &Membership) -> Result<(), DomainError> {
        self.record(self.composer.membership_approved(membership))
            .await
    }

    async fn reward_claim_submitted(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        self.record(self.composer.reward_claim_submitted(claim)).await
    }

    async fn claim_status_changed(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        match self.composer.claim_status_changed(claim) {
            Some(message) => self.record(message).await,
            None => Ok(()),
        }
    }
}
