// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Nexa.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of being silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Nexa configuration.
///
/// Every section is optional and falls back to the compiled defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NexaConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP API server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Server-side admin credentials.
    #[serde(default)]
    pub auth: AuthConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Headless client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Daily message retention.
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Chat rate limiting.
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error). `RUST_LOG` wins over it.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "nexa".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP API server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// How many of the newest messages `get_messages` returns.
    #[serde(default = "default_message_cap")]
    pub message_cap: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            message_cap: default_message_cap(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_message_cap() -> usize {
    100
}

/// Admin credentials checked by the API for admin-only actions.
///
/// Both fields unset means no admin account exists.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_email", &self.admin_email)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the server's SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn data_file(name: &str) -> String {
    dirs::data_dir()
        .map(|p| p.join("nexa").join(name))
        .unwrap_or_else(|| std::path::PathBuf::from(name))
        .to_string_lossy()
        .into_owned()
}

fn default_database_path() -> String {
    data_file("nexa.db")
}

fn default_wal_mode() -> bool {
    true
}

/// Headless client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the API endpoint, including the `/api` path.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Seconds between sync ticks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Extra ping attempts after the first one fails.
    #[serde(default = "default_boot_retries")]
    pub boot_retries: u32,

    #[serde(default = "default_boot_retry_delay_ms")]
    pub boot_retry_delay_ms: u64,

    /// Per-attempt timeout of the boot ping.
    #[serde(default = "default_boot_timeout_secs")]
    pub boot_timeout_secs: u64,

    /// SQLite file backing the client's local key-value store.
    #[serde(default = "default_local_db_path")]
    pub local_db_path: String,

    /// Skip the boot probe and run against the local snapshot only.
    #[serde(default)]
    pub force_local: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            poll_interval_secs: default_poll_interval_secs(),
            boot_retries: default_boot_retries(),
            boot_retry_delay_ms: default_boot_retry_delay_ms(),
            boot_timeout_secs: default_boot_timeout_secs(),
            local_db_path: default_local_db_path(),
            force_local: false,
        }
    }
}

fn default_api_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_boot_retries() -> u32 {
    2
}

fn default_boot_retry_delay_ms() -> u64 {
    2000
}

fn default_boot_timeout_secs() -> u64 {
    10
}

fn default_local_db_path() -> String {
    data_file("local.db")
}

/// Daily message retention configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Local hour (0-23) at which messages are cleared.
    #[serde(default = "default_reset_hour")]
    pub reset_hour: u32,

    #[serde(default)]
    pub reset_minute: u32,

    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            reset_hour: default_reset_hour(),
            reset_minute: 0,
            enabled: default_retention_enabled(),
        }
    }
}

fn default_reset_hour() -> u32 {
    7
}

fn default_retention_enabled() -> bool {
    true
}

/// Chat send limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Minimum seconds between two sends.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Sends allowed before the temporary ban kicks in.
    #[serde(default = "default_spam_limit")]
    pub spam_limit: u32,

    #[serde(default = "default_ban_secs")]
    pub ban_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            spam_limit: default_spam_limit(),
            ban_secs: default_ban_secs(),
        }
    }
}

fn default_cooldown_secs() -> u64 {
    1
}

fn default_spam_limit() -> u32 {
    20
}

fn default_ban_secs() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = NexaConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.message_cap, 100);
        assert_eq!(config.client.poll_interval_secs, 5);
        assert_eq!(config.client.boot_retries, 2);
        assert_eq!(config.client.boot_retry_delay_ms, 2000);
        assert_eq!(config.client.boot_timeout_secs, 10);
        assert!(!config.client.force_local);
        assert_eq!((config.retention.reset_hour, config.retention.reset_minute), (7, 0));
        assert_eq!(config.chat.spam_limit, 20);
        assert_eq!(config.chat.ban_secs, 300);
        assert!(config.auth.admin_email.is_none());
    }

    #[test]
    fn default_paths_live_under_nexa_data_dir() {
        let storage = StorageConfig::default();
        assert!(storage.database_path.ends_with("nexa.db"));
        assert!(ClientConfig::default().local_db_path.ends_with("local.db"));
    }

    #[test]
    fn auth_debug_redacts_password() {
        let auth = AuthConfig {
            admin_email: Some("admin@nexa.id".into()),
            admin_password: Some("s3cret".into()),
        };
        let debug = format!("{auth:?}");
        assert!(debug.contains("admin@nexa.id"));
        assert!(!debug.contains("s3cret"));
    }
}
