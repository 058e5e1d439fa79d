//! Dr. Nim - Unified CLI
//!
//! Plays against the computer, hosts or joins a networked game, or serves
//! Dr. Nim to challengers.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, FirstMover};
use dr_nim::config::CONFIG_ENV;
use dr_nim::session::{self, ChannelObserver, Opponent, SessionError, SessionProtocol};
use dr_nim::{GameConfig, console, server};
use dr_nim_core::{GameStatus, MatchRules, OptimalStrategy, Side};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let config = GameConfig::load(config_path.as_deref())?;

    let outcome = match cli.command {
        Command::Play { first } => play_computer(&config, first).await,
        Command::Host { port, host, first } => host_game(&config, &host, port, first).await,
        Command::Join { addr } => join_game(&config, &addr).await,
        Command::Serve {
            port,
            host,
            computer_first,
        } => return serve(config, &host, port, computer_first).await,
    };

    match outcome {
        Ok(status) => {
            info!(?status, "Goodbye");
            Ok(())
        }
        Err(SessionError::Transport(err)) => {
            error!(error = %err, "Session ended by I/O error");
            eprintln!("I/O error: {}", err);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}

/// Rules from the config with an optional opener override.
fn rules_for(config: &GameConfig, first: Option<FirstMover>) -> MatchRules {
    let mut rules = *config.rules();
    if let Some(first) = first {
        rules.first = Side::from(first);
    }
    rules
}

/// Play against Dr. Nim in this terminal
#[instrument(skip(config))]
async fn play_computer(
    config: &GameConfig,
    first: Option<FirstMover>,
) -> Result<GameStatus, SessionError> {
    let rules = rules_for(config, first);
    let opponent = Opponent::Computer(Box::new(OptimalStrategy::new(rules.win_rule)));
    console_session(config, rules, opponent).await
}

/// Host a game for a remote opponent
#[instrument(skip(config))]
async fn host_game(
    config: &GameConfig,
    host: &str,
    port: u16,
    first: Option<FirstMover>,
) -> Result<GameStatus, SessionError> {
    let rules = rules_for(config, first);
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(dr_nim::TransportError::from)?;
    let link = server::accept_guest(&listener, &rules, config).await?;
    console_session(config, rules, Opponent::Remote(link)).await
}

/// Join a hosted game
#[instrument(skip(config))]
async fn join_game(config: &GameConfig, addr: &str) -> Result<GameStatus, SessionError> {
    let (link, rules) = server::join_host(addr, config).await?;
    console_session(config, rules, Opponent::Remote(link)).await
}

/// Serve Dr. Nim to challengers until killed
#[instrument(skip(config))]
async fn serve(config: GameConfig, host: &str, port: u16, computer_first: bool) -> Result<()> {
    let rules = MatchRules {
        first: if computer_first { Side::Local } else { Side::Remote },
        ..*config.rules()
    };
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    server::serve(listener, rules, config).await?;
    Ok(())
}

/// Runs a session with the console in the local seat.
async fn console_session(
    config: &GameConfig,
    rules: MatchRules,
    opponent: Opponent,
) -> Result<GameStatus, SessionError> {
    let (handle, events) = session::channel();
    let (observer, notifications) = ChannelObserver::new();

    let printer = tokio::spawn(console::print_notifications(
        notifications,
        std::io::stdout(),
    ));
    if let Err(err) = console::spawn_stdin_reader(handle.clone()) {
        error!(error = %err, "Could not read the keyboard");
        return Err(SessionError::Closed);
    }

    let mut protocol = SessionProtocol::new(rules, opponent, Box::new(observer), handle, events)
        .with_read_timeout(config.read_timeout())
        .with_think_delay(config.think_delay());
    let result = protocol.run().await;

    // Dropping the protocol drops the observer, which ends the printer.
    drop(protocol);
    let _ = printer.await;
    result
}
