//! Resend email adapter.
//!
//! Sends workflow emails through `POST /emails` of the Resend API.
//! The API key is held as a `secrecy::SecretString`.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::claim::RewardClaim;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::membership::Membership;
use crate::domain::request::MembershipRequest;
use crate::ports::Notifier;

use super::{EmailMessage, MessageComposer};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from: String,
    api_base_url: String,
    /// Upper bound on one send, connect included.
    timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            from: from.into(),
            api_base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Notifier that delivers email through Resend.
pub struct ResendNotifier {
    config: ResendConfig,
    composer: MessageComposer,
    http_client: reqwest::Client,
}

impl ResendNotifier {
    /// # Errors
    ///
    /// `NotificationFailed` if the HTTP client cannot be built.
    pub fn new(config: ResendConfig, composer: MessageComposer) -> Result<Self, DomainError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::NotificationFailed,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            config,
            composer,
            http_client,
        })
    }

    pub fn from_config(email: &EmailConfig) -> Result<Self, DomainError> {
        let config = ResendConfig::new(email.resend_api_key.clone(), email.from_header())
            .with_base_url(email.api_base_url.clone())
            .with_timeout(email.timeout());
        Self::new(
            config,
            MessageComposer::new(email.store_name.clone(), email.admin_email.clone()),
        )
    }

    async fn send(&self, message: EmailMessage) -> Result<(), DomainError> {
        let url = format!("{}/emails", self.config.api_base_url);
        let body = SendEmailRequest {
            from: &self.config.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| DomainError::new(ErrorCode::NotificationFailed, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, subject = %message.subject, "Resend send failed");
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("Resend API error ({}): {}", status, error_text),
            ));
        }

        tracing::debug!(to = %message.to, subject = %message.subject, "Email sent");
        Ok(())
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn membership_request_received(
        &self,
        request: &MembershipRequest,
    ) -> Result<(), DomainError> {
        self.send(self.composer.membership_request_received(request))
            .await
    }

    async fn membership_approved(&self, membership: &Membership) -> Result<(), DomainError> {
        self.send(self.composer.membership_approved(membership)).await
    }

    async fn reward_claim_submitted(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        self.send(self.composer.reward_claim_submitted(claim)).await
    }

    async fn claim_status_changed(&self, claim: &RewardClaim) -> Result<(), DomainError> {
        match self.composer.claim_status_changed(claim) {
            Some(message) => self.send(message).await,
            None => Ok(()),
        }
    }
}
