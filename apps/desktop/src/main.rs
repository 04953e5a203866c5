use std::{path::PathBuf, str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    exit_signal, load_settings, BrowserSession, RandomUserClient, Screen, Settings, View,
};
use shared::domain::Decision;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Browse random profiles from the terminal.
#[derive(Parser, Debug)]
struct Args {
    /// Path to a swipe.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    batch_size: Option<usize>,
    /// Seed for reproducible batches.
    #[arg(long)]
    seed: Option<String>,
    /// Nationality filter, e.g. `gb,fr`.
    #[arg(long)]
    nat: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Decide(Decision),
    Reload,
    Liked,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "l" | "like" | "y" => Ok(Command::Decide(Decision::Accept)),
            "n" | "nope" => Ok(Command::Decide(Decision::Reject)),
            "r" | "reload" | "retry" | "more" => Ok(Command::Reload),
            "s" | "liked" => Ok(Command::Liked),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

const HELP: &str = "commands: [l]ike, [n]ope, [r]eload, [s]how liked, [h]elp, [q]uit";

fn render_screen(screen: &Screen) -> String {
    let mut out = match &screen.view {
        View::Blank if screen.loading => "Loading profiles...".to_string(),
        View::Blank => String::new(),
        View::Card(card) => format!(
            "[{}/{}] {}\n      {}\n      {}",
            card.position + 1,
            card.batch_len,
            card.name,
            card.subtitle(),
            card.image_url
        ),
        View::Terminal(terminal) => format!("{}\n{}", terminal.headline(), terminal.summary()),
        View::Error(error) => format!("{}\n({})", error.message, error.detail),
    };
    if let Some(action) = screen.action() {
        out.push_str(&format!("\n> type 'r' to {}", action.label().to_ascii_lowercase()));
    }
    out.push_str(&format!("\nliked: {}", screen.liked_count));
    out
}

/// Config file and environment first, then command line flags on top.
fn resolve_settings(args: Args) -> Result<Settings> {
    let mut settings = load_settings(args.config.as_deref()).context("failed to load settings")?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(batch_size) = args.batch_size {
        settings.batch_size = batch_size;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.nat.is_some() {
        settings.nationalities = args.nat;
    }
    settings.validate().context("invalid command line settings")?;
    tracing::info!(
        api_url = %settings.api_url,
        batch_size = settings.batch_size,
        seed = ?settings.seed,
        nat = ?settings.nationalities,
        "settings loaded"
    );
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = resolve_settings(args)?;

    let source = Arc::new(RandomUserClient::from_settings(&settings));
    let mut session = BrowserSession::new(source, settings);

    println!("{HELP}");
    session.fetch_batch().await;
    println!("{}", render_screen(&session.screen()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                tracing::warn!(input = %line.trim(), "rejected command");
                println!("{err}");
                continue;
            }
        };

        match command {
            Command::Decide(decision) => {
                // No animation to wait for in the terminal.
                let (signal, waiter) = exit_signal();
                signal.fire();
                if session.decide(decision, waiter).await.is_none() {
                    println!("nothing to {} right now", decision.label());
                }
            }
            Command::Reload => {
                if session.screen().action().is_some() {
                    session.fetch_batch().await;
                } else {
                    println!("finish this batch first");
                }
            }
            Command::Liked => {
                for profile in session.browser().liked() {
                    println!("  {} ({}, {})", profile.display_name(), profile.age, profile.location());
                }
                continue;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }
        println!("{}", render_screen(&session.screen()));
    }

    let liked = session.browser().liked_count();
    tracing::info!(liked, "session finished");
    println!("liked {liked} profile(s) this session");
    Ok(())
}
