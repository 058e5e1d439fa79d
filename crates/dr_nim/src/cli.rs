//! Command-line interface for dr_nim.

use clap::{Parser, Subcommand, ValueEnum};
use dr_nim_core::Side;

/// Dr. Nim - take 1, 2 or 3 marbles; take the last one to win
#[derive(Parser, Debug)]
#[command(name = "dr_nim")]
#[command(about = "Play Dr. Nim against the computer or over the network", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (falls back to $DR_NIM_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play against Dr. Nim in this terminal
    Play {
        /// Who opens the game (overrides the config)
        #[arg(long, value_enum)]
        first: Option<FirstMover>,
    },

    /// Wait for an opponent to join over TCP
    Host {
        /// Port to bind to
        #[arg(short, long, default_value = "4040")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Who opens the game (overrides the config)
        #[arg(long, value_enum)]
        first: Option<FirstMover>,
    },

    /// Join a hosted game
    Join {
        /// Address of the host
        #[arg(short, long, default_value = "127.0.0.1:4040")]
        addr: String,
    },

    /// Let Dr. Nim take on challengers over TCP
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "4040")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Dr. Nim opens every game instead of the challenger
        #[arg(long)]
        computer_first: bool,
    },
}

/// Opening side, named from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstMover {
    /// You open
    You,
    /// Your opponent opens
    Opponent,
}

impl From<FirstMover> for Side {
    fn from(first: FirstMover) -> Self {
        match first {
            FirstMover::You => Side::Local,
            FirstMover::Opponent => Side::Remote,
        }
    }
}
