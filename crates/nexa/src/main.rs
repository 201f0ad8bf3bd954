// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nexa - chat and helpdesk with a local-first client.
//!
//! This is the binary entry point: `serve` runs the API gateway, `client`
//! opens an interactive client context and `status` probes a running server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod client;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nexa - chat and helpdesk with a local-first client.
#[derive(Parser, Debug)]
#[command(name = "nexa", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server.
    Serve,
    /// Open an interactive client context.
    Client {
        /// Skip the server probe and work on the local snapshot only.
        #[arg(long)]
        local: bool,
        /// Log in right after boot.
        #[arg(long, requires = "password")]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },
    /// Show whether the server is running.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => nexa_config::load_and_validate_path(path),
        None => nexa_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            nexa_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Client {
            local,
            email,
            password,
        }) => {
            config.client.force_local |= local;
            let login = email.zip(password);
            client::run_client(config, login).await
        }
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        None => {
            println!("nexa: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn client_flags_parse() {
        let cli = Cli::parse_from([
            "nexa",
            "client",
            "--local",
            "--email",
            "a@nexa.id",
            "--password",
            "pw",
        ]);
        match cli.command {
            Some(Commands::Client {
                local,
                email,
                password,
            }) => {
                assert!(local);
                assert_eq!(email.as_deref(), Some("a@nexa.id"));
                assert_eq!(password.as_deref(), Some("pw"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn email_without_password_is_rejected() {
        assert!(Cli::try_parse_from(["nexa", "client", "--email", "a@nexa.id"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["nexa", "status", "--config", "/tmp/nexa.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/nexa.toml")));
    }
}
