//! Configuration module
//!
//! Reads a TOML configuration file (default
//! `~/.config/armada-transit/config.toml`, overridable through the
//! `TRANSIT_CONFIG` environment variable). Every section has defaults so the
//! service starts with an empty file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingConfig,
    pub payment: PaymentConfig,
    pub mail: MailConfig,
    pub booking: BookingConfig,
    pub reminders: ReminderConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./transit.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Payment gateway settings. The gateway is an opaque remote service that
/// issues invoices and disbursements and reports payment outcomes through
/// the `/api/v1/payments/callback` webhook.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub base_url: String,
    pub api_key: String,
    /// HMAC secret for callback signature verification. Empty disables
    /// verification (local development only).
    pub callback_secret: String,
    pub currency: String,
    /// Fixed admin fee added on top of the order subtotal, in minor units
    pub admin_fee: i64,
    pub timeout_secs: u64,
    pub success_redirect_url: String,
    pub failure_redirect_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            api_key: String::new(),
            callback_secret: String::new(),
            currency: "IDR".to_string(),
            admin_fee: 5_000,
            timeout_secs: 15,
            success_redirect_url: "http://localhost:3000/payment/success".to_string(),
            failure_redirect_url: "http://localhost:3000/payment/failed".to_string(),
        }
    }
}

/// Mail relay settings. Reminder emails are posted to a relay endpoint;
/// rendering and delivery are the relay's concern.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub relay_url: String,
    pub sender: String,
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://localhost:9100".to_string(),
            sender: "noreply@armada-transit.example".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Minutes an ONHOLD seat stays reserved before the expiry sweep
    /// releases it back to inventory
    pub hold_ttl_minutes: i64,
    /// Seconds between hold-expiry sweep runs
    pub hold_check_interval_secs: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            hold_ttl_minutes: 30,
            hold_check_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Shared secret expected in the `x-reminder-token` header of sweep triggers
    pub token: String,
    /// Kilometers before a service threshold at which the pre-window opens
    pub maintenance_tolerance_km: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            token: "change-me".to_string(),
            maintenance_tolerance_km: 500,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default configuration path: `~/.config/armada-transit/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("armada-transit")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.booking.hold_ttl_minutes, 30);
        assert!(cfg.database.url.starts_with("sqlite://"));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [payment]
            admin_fee = 7500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.payment.admin_fee, 7500);
        assert_eq!(cfg.payment.currency, "IDR");
    }
}
