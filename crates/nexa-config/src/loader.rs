// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./nexa.toml` > `~/.config/nexa/nexa.toml` > `/etc/nexa/nexa.toml`,
//! with `NEXA_*` environment variables overriding every file.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NexaConfig;

/// Top-level sections, used to split `NEXA_SECTION_KEY` env names.
const SECTIONS: &[&str] = &[
    "app",
    "server",
    "auth",
    "storage",
    "client",
    "retention",
    "chat",
];

pub(crate) const SYSTEM_CONFIG: &str = "/etc/nexa/nexa.toml";
pub(crate) const LOCAL_CONFIG: &str = "nexa.toml";

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nexa").join("nexa.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/nexa/nexa.toml`
/// 3. `~/.config/nexa/nexa.toml`
/// 4. `./nexa.toml`
/// 5. `NEXA_*` environment variables
pub fn load_config() -> Result<NexaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string over the compiled defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<NexaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NexaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NexaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NexaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(NexaConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Environment provider mapping `NEXA_CLIENT_POLL_INTERVAL_SECS` to
/// `client.poll_interval_secs`.
///
/// Only the section prefix is split; key names keep their underscores.
fn env_provider() -> Env {
    Env::prefixed("NEXA_").map(|key| env_key_to_path(key.as_str()).into())
}

pub(crate) fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_split_on_section_only() {
        assert_eq!(
            env_key_to_path("client_poll_interval_secs"),
            "client.poll_interval_secs"
        );
        assert_eq!(env_key_to_path("AUTH_ADMIN_EMAIL"), "auth.admin_email");
        assert_eq!(env_key_to_path("retention_reset_hour"), "retention.reset_hour");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(env_key_to_path("bogus_key"), "bogus_key");
    }

    #[test]
    fn section_name_prefixes_do_not_collide() {
        // `chat_` must not match inside other keys, and `app` needs its underscore.
        assert_eq!(env_key_to_path("chat_ban_secs"), "chat.ban_secs");
        assert_eq!(env_key_to_path("application"), "application");
    }
}
