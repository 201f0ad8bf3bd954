// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nexa status` command implementation.
//!
//! Asks the configured server's `/health` endpoint for its state, version
//! and uptime. A server that does not answer is reported as not running.

use std::io::IsTerminal;
use std::time::Duration;

use colored::Colorize;
use nexa_config::model::NexaConfig;
use nexa_core::NexaError;
use nexa_gateway::handlers::HealthResponse;
use serde::Serialize;
use tracing::debug;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub endpoint: String,
}

impl StatusReport {
    fn running(endpoint: String, health: HealthResponse) -> Self {
        Self {
            running: true,
            uptime_human: Some(format_uptime(health.uptime_secs)),
            status: health.status,
            version: Some(health.version),
            uptime_secs: Some(health.uptime_secs),
            endpoint,
        }
    }

    fn offline(endpoint: String) -> Self {
        Self {
            running: false,
            status: "not running".to_string(),
            version: None,
            uptime_secs: None,
            uptime_human: None,
            endpoint,
        }
    }

    /// Human-readable rendering, colored when `use_color` is set.
    fn render(&self, use_color: bool) -> String {
        let mut out = format!("\n  nexa status\n  {}\n", "-".repeat(35));
        let state = if self.running {
            let uptime = self.uptime_human.as_deref().unwrap_or("?");
            let version = self.version.as_deref().unwrap_or("?");
            if use_color {
                format!(
                    "{} {} (v{version}, uptime: {uptime})",
                    "✓".green(),
                    self.status.green()
                )
            } else {
                format!("[OK] {} (v{version}, uptime: {uptime})", self.status)
            }
        } else if use_color {
            format!("{} {}", "✗".red(), self.status.red())
        } else {
            format!("[FAIL] {}", self.status)
        };
        out.push_str(&format!("    State:    {state}\n"));
        out.push_str(&format!("    Endpoint: {}\n", self.endpoint));
        if !self.running {
            out.push_str("\n  Start with: nexa serve\n");
        }
        out
    }
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Query `endpoint` and build the report; failures mean "not running".
pub async fn probe(endpoint: String) -> Result<StatusReport, NexaError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| NexaError::Internal(format!("failed to create HTTP client: {e}")))?;

    let response = match client.get(&endpoint).send().await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            debug!(status = %resp.status(), "health endpoint answered with an error");
            return Ok(StatusReport::offline(endpoint));
        }
        Err(e) => {
            debug!(error = %e, "health endpoint unreachable");
            return Ok(StatusReport::offline(endpoint));
        }
    };
    let health: HealthResponse = response.json().await.map_err(|e| NexaError::Remote {
        message: format!("failed to parse health response: {e}"),
        source: Some(Box::new(e)),
    })?;
    Ok(StatusReport::running(endpoint, health))
}

/// Run the `nexa status` command.
pub async fn run_status(config: &NexaConfig, json: bool, plain: bool) -> Result<(), NexaError> {
    let endpoint = format!("http://{}:{}/health", config.server.host, config.server.port);
    let report = probe(endpoint).await?;

    if json {
        let body = serde_json::to_string_pretty(&report)?;
        println!("{body}");
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        println!("{}", report.render(use_color));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health(uptime_secs: u64) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs,
        }
    }

    #[test]
    fn format_uptime_minutes() {
        assert_eq!(format_uptime(120), "2m");
    }

    #[test]
    fn format_uptime_hours() {
        assert_eq!(format_uptime(3720), "1h 2m");
    }

    #[test]
    fn format_uptime_days() {
        assert_eq!(format_uptime(90060), "1d 1h 1m");
    }

    #[test]
    fn running_report_renders_plain() {
        let report = StatusReport::running("http://127.0.0.1:3000/health".into(), health(3720));
        let text = report.render(false);
        assert!(text.contains("[OK] ok (v0.1.0, uptime: 1h 2m)"));
        assert!(!text.contains("Start with"));
    }

    #[test]
    fn offline_report_serializes() {
        let report = StatusReport::offline("http://127.0.0.1:3000/health".into());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"running\":false"));
        assert!(report.render(false).contains("[FAIL] not running"));
    }

    #[tokio::test]
    async fn unreachable_server_is_not_running() {
        // Port 9 (discard) is closed on test machines.
        let report = probe("http://127.0.0.1:9/health".into()).await.unwrap();
        assert!(!report.running);
    }
}
