// SPDX-FileCopyrightText: 2026 Nexa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nexa client` command implementation.
//!
//! Boots one client context against the configured API (or the local
//! snapshot), starts its sync loop and drives it from a readline prompt.
//! Plain lines are sent as chat messages; `/`-commands cover the rest.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use nexa_bus::EventBus;
use nexa_client::profile::content_type_for;
use nexa_client::{AvatarUpload, Draft, HttpRemote, NexaClient, shutdown};
use nexa_config::model::NexaConfig;
use nexa_core::{Message, NexaError, RemoteSource, Suggestion, Ticket};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::serve::init_tracing;

/// How many of the newest messages `/messages` prints.
const SHOWN_MESSAGES: usize = 20;

const HELP: &str = "\
  <text>                    send a chat message (`.Brat <query>` asks the bot)
  /login <email> <password> log in
  /logout                   log out
  /whoami                   show the current user
  /messages                 show recent messages
  /sticker <url>            send a sticker
  /fav <url>                toggle a favourite sticker
  /tickets                  list visible tickets
  /ticket <subject>         open a ticket
  /close <id>               close a ticket (admin)
  /delete-ticket <id>       delete a ticket (admin)
  /suggestions              list suggestions
  /suggest <text>           submit a suggestion
  /delete-suggestion <id>   delete a suggestion (admin)
  /name <name>              change the display name
  /avatar <path>            upload a JPEG or PNG avatar (max 2 MiB)
  /sync                     reconcile now
  /quit                     exit";

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Say(String),
    Sticker(String),
    Login { email: String, password: String },
    Logout,
    Whoami,
    Messages,
    Favorite(String),
    Tickets,
    Ticket(String),
    Close(String),
    DeleteTicket(String),
    Suggestions,
    Suggest(String),
    DeleteSuggestion(String),
    Name(String),
    Avatar(String),
    Sync,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse a prompt line. Blank lines yield `Ok(None)`.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Some(Self::Say(line.to_string())));
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let required = |usage: &str| {
            if arg.is_empty() {
                Err(format!("usage: /{name} {usage}"))
            } else {
                Ok(arg.to_string())
            }
        };
        let command = match name {
            "login" => match arg.split_once(char::is_whitespace) {
                Some((email, password)) if !password.trim().is_empty() => Self::Login {
                    email: email.to_string(),
                    password: password.trim().to_string(),
                },
                _ => return Err("usage: /login <email> <password>".to_string()),
            },
            "logout" => Self::Logout,
            "whoami" => Self::Whoami,
            "messages" => Self::Messages,
            "sticker" => Self::Sticker(required("<url>")?),
            "fav" => Self::Favorite(required("<url>")?),
            "tickets" => Self::Tickets,
            "ticket" => Self::Ticket(required("<subject>")?),
            "close" => Self::Close(required("<id>")?),
            "delete-ticket" => Self::DeleteTicket(required("<id>")?),
            "suggestions" => Self::Suggestions,
            "suggest" => Self::Suggest(required("<text>")?),
            "delete-suggestion" => Self::DeleteSuggestion(required("<id>")?),
            "name" => Self::Name(required("<name>")?),
            "avatar" => Self::Avatar(required("<path>")?),
            "sync" => Self::Sync,
            "help" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command `/{other}`, try /help")),
        };
        Ok(Some(command))
    }
}

fn clock_time(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

fn format_message(message: &Message) -> String {
    let mut line = format!(
        "[{}] {}: {}",
        clock_time(message.timestamp),
        message.user_name,
        message.text
    );
    for url in [&message.sticker_url, &message.image_url].into_iter().flatten() {
        line.push_str(&format!(" <{url}>"));
    }
    line
}

fn format_ticket(ticket: &Ticket) -> String {
    format!(
        "{} [{}] {} ({})",
        ticket.id, ticket.status, ticket.subject, ticket.user_name
    )
}

fn format_suggestion(suggestion: &Suggestion) -> String {
    format!(
        "{} {}: {}",
        suggestion.id, suggestion.user_name, suggestion.content
    )
}

/// Execute one command. Returns `false` when the session should end.
async fn execute(client: &NexaClient, command: ReplCommand) -> Result<bool, NexaError> {
    match command {
        ReplCommand::Say(text) => {
            let sent = client.send_message(Draft::text(text)).await?;
            println!("{}", format_message(&sent).dimmed());
        }
        ReplCommand::Sticker(url) => {
            client.send_message(Draft::sticker(url)).await?;
        }
        ReplCommand::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            println!("logged in as {} ({})", user.name.bold(), user.role);
        }
        ReplCommand::Logout => {
            client.logout().await?;
            println!("logged out");
        }
        ReplCommand::Whoami => match client.user().await {
            Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
            None => println!("not logged in"),
        },
        ReplCommand::Messages => {
            let view = client.view();
            let view = view.read().await;
            let messages = view.messages();
            for message in &messages[messages.len().saturating_sub(SHOWN_MESSAGES)..] {
                println!("{}", format_message(message));
            }
        }
        ReplCommand::Favorite(url) => {
            let favorites = client.toggle_favorite_sticker(&url).await?;
            println!("{} favourite sticker(s)", favorites.len());
        }
        ReplCommand::Tickets => {
            for ticket in client.visible_tickets().await? {
                println!("{}", format_ticket(&ticket));
            }
        }
        ReplCommand::Ticket(subject) => {
            let ticket = client.create_ticket(&subject).await?;
            println!("opened {}", ticket.id);
        }
        ReplCommand::Close(id) => {
            client.close_ticket(&id).await?;
            println!("closed {id}");
        }
        ReplCommand::DeleteTicket(id) => {
            client.delete_ticket(&id).await?;
            println!("deleted {id}");
        }
        ReplCommand::Suggestions => {
            let view = client.view();
            for suggestion in view.read().await.suggestions() {
                println!("{}", format_suggestion(suggestion));
            }
        }
        ReplCommand::Suggest(content) => {
            let suggestion = client.create_suggestion(&content).await?;
            println!("submitted {}", suggestion.id);
        }
        ReplCommand::DeleteSuggestion(id) => {
            client.delete_suggestion(&id).await?;
            println!("deleted {id}");
        }
        ReplCommand::Name(name) => {
            let user = client.update_profile(&name, None).await?;
            println!("now known as {}", user.name.bold());
        }
        ReplCommand::Avatar(path) => {
            let Some(current) = client.user().await else {
                return Err(NexaError::Forbidden("login required".to_string()));
            };
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| NexaError::Validation(format!("cannot read `{path}`: {e}")))?;
            let upload = AvatarUpload {
                content_type: content_type_for(Path::new(&path)),
                bytes: &bytes,
            };
            client.update_profile(&current.name, Some(upload)).await?;
            println!("avatar updated");
        }
        ReplCommand::Sync => client.sync_now().await?,
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Runs the `nexa client` interactive prompt.
pub async fn run_client(
    config: NexaConfig,
    login: Option<(String, String)>,
) -> Result<(), NexaError> {
    init_tracing(&config.app.log_level);

    let store = nexa_client::open_local_store(&config).await?;
    let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemote::new(&config.client.api_url)?);
    let bus = EventBus::default();
    let client = NexaClient::start(&config, remote, store, bus.handle()).await?;

    if client.is_online() {
        println!("{} {}", "nexa client".bold().green(), config.client.api_url);
    } else {
        println!("{} {}", "nexa client".bold().yellow(), "(local only)".yellow());
    }
    if let Some((email, password)) = login {
        let user = client.login(&email, &password).await?;
        println!("logged in as {}", user.name.bold());
    } else if let Some(user) = client.user().await {
        println!("welcome back, {}", user.name.bold());
    }
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let cancel = shutdown::install_signal_handler();
    let tasks = client.spawn_background(cancel.clone());

    let mut rl = DefaultEditor::new()
        .map_err(|e| NexaError::Internal(format!("failed to initialize readline: {e}")))?;
    let prompt = format!("{}> ", "nexa".green());
    loop {
        if cancel.is_cancelled() {
            break;
        }
        match tokio::task::block_in_place(|| rl.readline(&prompt)) {
            Ok(line) => {
                let command = match ReplCommand::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(usage) => {
                        eprintln!("{}", usage.yellow());
                        continue;
                    }
                };
                let _ = rl.add_history_entry(line.as_str());
                match execute(&client, command).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    cancel.cancel();
    for task in tasks {
        if let Err(e) = task.await {
            debug!(error = %e, "background task ended abnormally");
        }
    }
    println!("{}", "goodbye".dimmed());
    Ok(())
}
