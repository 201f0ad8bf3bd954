// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boot sequence: decide between online and local-only mode.
//!
//! The remote is probed with `ping`, each attempt bounded by a timeout and
//! retried a fixed number of times. Exhausting the attempts is terminal:
//! the client runs local-only until restarted.

use std::time::Duration;

use nexa_config::model::ClientConfig;
use nexa_core::{PingStatus, RemoteSource, User};
use nexa_resilience::RetryPolicy;
use tracing::{debug, info, warn};

use crate::store::LocalStore;

/// How the boot probe behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootSettings {
    pub retry: RetryPolicy,
    /// Skip the probe entirely.
    pub force_local: bool,
}

impl BootSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            retry: RetryPolicy {
                retries: config.boot_retries,
                delay: Duration::from_millis(config.boot_retry_delay_ms),
                attempt_timeout: Duration::from_secs(config.boot_timeout_secs),
            },
            force_local: config.force_local,
        }
    }
}

impl Default for BootSettings {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootOutcome {
    /// The remote answered; it is the source of truth.
    Online(PingStatus),
    /// The local snapshot is the source of truth for the rest of the run.
    LocalOnly { reason: String },
}

impl BootOutcome {
    pub fn is_online(&self) -> bool {
        matches!(self, BootOutcome::Online(_))
    }
}

/// Probe `remote` according to `settings`.
pub async fn probe(remote: &dyn RemoteSource, settings: &BootSettings) -> BootOutcome {
    if settings.force_local {
        info!("local-only mode forced, skipping remote probe");
        return BootOutcome::LocalOnly {
            reason: "local-only mode forced".to_string(),
        };
    }

    let result = settings
        .retry
        .run("boot ping", |attempt| {
            debug!(attempt, "pinging remote");
            remote.ping()
        })
        .await;

    match result {
        Ok(status) => {
            info!(version = %status.version, "remote reachable, running online");
            BootOutcome::Online(status)
        }
        Err(e) => {
            warn!(
                attempts = settings.retry.max_attempts(),
                error = %e,
                "remote unreachable, switching to local-only mode"
            );
            BootOutcome::LocalOnly {
                reason: e.to_string(),
            }
        }
    }
}

/// Recall the last logged-in user. Failures are logged and treated as no session.
pub async fn restore_session(store: &LocalStore) -> Option<User> {
    match store.load_session().await {
        Ok(Some(user)) => {
            info!(user = %user.name, "session restored");
            Some(user)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "could not read saved session");
            None
        }
    }
}
