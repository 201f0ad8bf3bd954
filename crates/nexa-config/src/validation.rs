// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: ranges, URL
//! schemes, non-empty paths and paired credentials.

use crate::diagnostic::ConfigError;
use crate::model::NexaConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &NexaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "server.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !(1..=1000).contains(&config.server.message_cap) {
        fail(format!(
            "server.message_cap must be between 1 and 1000, got {}",
            config.server.message_cap
        ));
    }

    match (&config.auth.admin_email, &config.auth.admin_password) {
        (Some(_), None) | (None, Some(_)) => fail(
            "auth.admin_email and auth.admin_password must be set together".to_string(),
        ),
        (Some(email), Some(password)) => {
            if !email.contains('@') {
                fail(format!("auth.admin_email `{email}` is not an email address"));
            }
            if password.is_empty() {
                fail("auth.admin_password must not be empty".to_string());
            }
        }
        (None, None) => {}
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let client = &config.client;
    if !(client.api_url.starts_with("http://") || client.api_url.starts_with("https://")) {
        fail(format!(
            "client.api_url must start with http:// or https://, got `{}`",
            client.api_url
        ));
    }
    if client.poll_interval_secs < 1 {
        fail("client.poll_interval_secs must be at least 1".to_string());
    }
    if client.boot_retries > 5 {
        fail(format!(
            "client.boot_retries must be at most 5, got {}",
            client.boot_retries
        ));
    }
    if client.boot_timeout_secs < 1 {
        fail("client.boot_timeout_secs must be at least 1".to_string());
    }
    if client.local_db_path.trim().is_empty() {
        fail("client.local_db_path must not be empty".to_string());
    }

    if config.retention.reset_hour >= 24 {
        fail(format!(
            "retention.reset_hour must be below 24, got {}",
            config.retention.reset_hour
        ));
    }
    if config.retention.reset_minute >= 60 {
        fail(format!(
            "retention.reset_minute must be below 60, got {}",
            config.retention.reset_minute
        ));
    }

    if config.chat.spam_limit < 1 {
        fail("chat.spam_limit must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
