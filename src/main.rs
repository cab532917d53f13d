// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image Feed command-line client
//!
//! Drives the data layer from a terminal: log in with an authorization
//! code, page through the feed, like photos and log out.

use clap::{Parser, Subcommand};
use image_feed::{config::Config, services::extract_code, time_utils, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "image-feed")]
#[command(about = "Photo feed client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the web login URL
    AuthorizeUrl,
    /// Exchange an authorization code (or the redirect URL carrying it)
    Login {
        #[arg(value_name = "CODE_OR_URL")]
        code: String,
    },
    /// Print pages of the photo feed
    Feed {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Like (or unlike) a photo
    Like {
        photo_id: String,
        #[arg(long)]
        unlike: bool,
    },
    /// Forget the saved token
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let state = AppState::new(config)?;

    let _session_events = state.session.subscribe(|event| {
        tracing::debug!(?event, "Session event");
    });

    match cli.command {
        Command::AuthorizeUrl => println!("{}", state.config.authorize_url()),
        Command::Login { code } => {
            let code = extract_code(&code).unwrap_or(code);
            let profile = state.session.complete_login(&code).await?;
            println!("Logged in as {} ({})", profile.name, profile.login_name);
            if let Some(url) = state.avatar.avatar_url() {
                println!("Avatar: {}", url);
            }
        }
        Command::Feed { pages } => {
            if state.session.start().await?.is_none() {
                println!("Not logged in. Open:\n{}", state.config.authorize_url());
                return Ok(());
            }
            for _ in 1..pages {
                state.feed.fetch_next_page().await;
            }
            for photo in state.feed.photos().iter() {
                println!(
                    "{}\t{}x{}\t{}\t{}\t{}",
                    photo.id,
                    photo.size.width,
                    photo.size.height,
                    photo
                        .created_at
                        .map(time_utils::format_utc_rfc3339)
                        .unwrap_or_else(|| "-".to_string()),
                    if photo.is_liked { "♥" } else { " " },
                    photo.thumb_image_url,
                );
            }
        }
        Command::Like { photo_id, unlike } => {
            state.feed.toggle_like(&photo_id, !unlike).await?;
            println!("{} {}", if unlike { "Unliked" } else { "Liked" }, photo_id);
        }
        Command::Logout => {
            if state.session.logout() {
                println!("Logged out");
            } else {
                println!("Already logged out");
            }
        }
    }

    Ok(())
}

/// Initialize logging; JSON lines when `LOG_FORMAT=json`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("image_feed=debug,info"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
