//! `graphmail` - console Microsoft Graph mail client.
//!
//! Signs in with the OAuth2 device-code grant and offers a small text menu
//! for inspecting the signed-in account and listing unread inbox mail.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;

use anyhow::{Context, Result};
use graphmail_api::GraphClient;
use graphmail_oauth::ChallengeHandler;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graphmail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting graphmail");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "graphmail.toml".to_string());
    let config = Config::load(Path::new(&path)).context(
        "unable to read OAuth configuration; make sure you have a properly \
         formatted graphmail.toml (see README for details)",
    )?;

    let on_challenge: ChallengeHandler = Arc::new(|challenge| {
        println!("To sign in, use a web browser to open {}", challenge.verification_uri);
        println!("and enter the code {} to authenticate.", challenge.user_code);
    });

    let mut client = GraphClient::new();
    client.initialize(&config.auth_config(), on_challenge)?;

    menu_loop(&client).await
}

/// Runs the interactive menu until the user chooses to exit.
async fn menu_loop(client: &GraphClient) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("Please choose one of the following options:");
        println!("0. Exit");
        println!("1. Display access token");
        println!("2. List my inbox");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            // stdin closed
            return Ok(());
        };

        match line?.trim().parse::<u32>() {
            Ok(0) => {
                println!("Goodbye...");
                return Ok(());
            }
            Ok(1) => {
                if let Err(e) = display_token(client).await {
                    eprintln!("Error: {e}");
                }
            }
            Ok(2) => {
                if let Err(e) = list_inbox(client).await {
                    eprintln!("Error: {e}");
                }
            }
            _ => println!("Invalid choice"),
        }
    }
}

/// Prints the current access token on the user's explicit request.
async fn display_token(client: &GraphClient) -> Result<()> {
    let token = client.token().await?;
    println!("{token}");
    Ok(())
}

/// Greets the signed-in user and prints their unread inbox messages.
///
/// Read-state filtering happens here, in the presentation layer; the core
/// returns the first page exactly as the server ordered it.
async fn list_inbox(client: &GraphClient) -> Result<()> {
    let user = client.current_user().await?;
    println!("Hello, {}!", user.display_name.as_deref().unwrap_or("there"));

    let messages = client.inbox_page().await?;
    for message in messages.iter().filter(|m| !m.is_read) {
        println!("Subject: {}", message.subject);
        println!("From: {}", message.from_address().unwrap_or("unknown"));
        println!("Received: {}", message.received_date_time);
        println!();
    }
    Ok(())
}
