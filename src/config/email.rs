//! Email configuration
//!
//! Optional section. Without it workflow notifications are only logged.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: String,

    /// Inbox that receives request and claim alerts
    pub admin_email: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// Store name shown as sender and in message bodies
    #[serde(default = "default_store_name")]
    pub store_name: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-send HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.store_name, self.from_email)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if !self.admin_email.contains('@') {
            return Err(ValidationError::InvalidAdminEmail);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: String::new(),
            admin_email: String::new(),
            from_email: default_from_email(),
            store_name: default_store_name(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@gurubagavansarees.com".to_string()
}

fn default_store_name() -> String {
    "Gurubagavan Sarees".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
