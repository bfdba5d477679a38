//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEMBERSHIP_REWARDS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use membership_rewards::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod database;
mod email;
mod error;
mod plans;
mod server;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use plans::PlansConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and logging
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; in-memory stores when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Resend email; log-only notifications when absent
    #[serde(default)]
    pub email: Option<EmailConfig>,

    /// Plan catalog source
    #[serde(default)]
    pub plans: PlansConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBERSHIP_REWARDS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEMBERSHIP_REWARDS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MEMBERSHIP_REWARDS__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBERSHIP_REWARDS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(email) = &self.email {
            email.validate()?;
        }
        self.plans.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "MEMBERSHIP_REWARDS__SERVER__PORT",
        "MEMBERSHIP_REWARDS__SERVER__JSON_LOGS",
        "MEMBERSHIP_REWARDS__DATABASE__URL",
        "MEMBERSHIP_REWARDS__EMAIL__RESEND_API_KEY",
        "MEMBERSHIP_REWARDS__EMAIL__ADMIN_EMAIL",
        "MEMBERSHIP_REWARDS__PLANS__CATALOG_PATH",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_no_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 5000);
        assert!(config.database.is_none());
        assert!(config.email.is_none());
        assert!(config.plans.catalog_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_optional_sections() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "MEMBERSHIP_REWARDS__DATABASE__URL",
            "postgresql://store@localhost/store",
        );
        env::set_var("MEMBERSHIP_REWARDS__EMAIL__RESEND_API_KEY", "re_xxx");
        env::set_var("MEMBERSHIP_REWARDS__EMAIL__ADMIN_EMAIL", "owner@example.com");
        env::set_var("MEMBERSHIP_REWARDS__PLANS__CATALOG_PATH", "/etc/store/plans.yaml");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgresql://store@localhost/store")
        );
        let email = config.email.as_ref().unwrap();
        assert_eq!(email.admin_email, "owner@example.com");
        assert_eq!(email.store_name, "Gurubagavan Sarees");
        assert!(config.plans.catalog_path.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_port_and_log_format() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("MEMBERSHIP_REWARDS__SERVER__PORT", "3000");
        env::set_var("MEMBERSHIP_REWARDS__SERVER__JSON_LOGS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.server.json_logs);
    }

    #[test]
    fn test_invalid_email_section_fails_validation() {
        let config = AppConfig {
            email: Some(EmailConfig {
                resend_api_key: "bad".to_string(),
                admin_email: "owner@example.com".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidResendKey));
    }
}
