//! Line-oriented console front-end.
//!
//! Renders notifications as text on stdout and turns typed commands
//! into session intents.

use crate::session::{Notification, SessionHandle};
use dr_nim_core::Move;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// Marble glyph used on the board line.
const MARBLE: &str = "●";

/// A parsed line of console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Make a move.
    Move(Move),
    /// Leave the game.
    Quit,
}

/// Parses one typed line; blank or unknown input gives `None`.
pub fn parse_input(line: &str) -> Option<ConsoleInput> {
    let token = line.trim();
    if token.eq_ignore_ascii_case("q") || token.eq_ignore_ascii_case("quit") {
        return Some(ConsoleInput::Quit);
    }
    Move::from_str(token).ok().map(ConsoleInput::Move)
}

/// Text shown for a notification, if it shows anything.
pub fn render(notification: &Notification) -> Option<String> {
    match notification {
        Notification::Display(marbles) => Some(format!(
            "{} ({} left)",
            MARBLE.repeat(usize::from(*marbles)),
            marbles
        )),
        Notification::PlayerTurn => Some("Your turn!".to_string()),
        Notification::DimTurn => Some("Dr. Nim's turn!".to_string()),
        Notification::PlayerWin => Some("You won!".to_string()),
        Notification::DimWin => Some("Dr. Nim won!".to_string()),
        Notification::EnableButtons => Some("Take 1, 2 or 3 (p to pass, q to quit):".to_string()),
        Notification::IoError(message) => Some(format!("I/O error: {}", message)),
        Notification::EmptyText | Notification::DisableButtons => None,
    }
}

/// Prints notifications until the session drops its observer.
#[instrument(skip_all)]
pub async fn print_notifications(
    mut notifications: mpsc::UnboundedReceiver<Notification>,
    mut out: impl Write,
) {
    while let Some(notification) = notifications.recv().await {
        if let Some(text) = render(&notification)
            && let Err(err) = writeln!(out, "{}", text).and_then(|()| out.flush())
        {
            warn!(error = %err, "Console output failed");
            break;
        }
    }
    debug!("Console output closed");
}

/// Feeds typed lines from `input` to the session.
///
/// Blocking; end of input counts as quitting.
pub fn forward_input(input: impl BufRead, handle: &SessionHandle) {
    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        let sent = match parse_input(&line) {
            Some(ConsoleInput::Move(mv)) => handle.submit(mv),
            Some(ConsoleInput::Quit) => {
                let _ = handle.quit();
                return;
            }
            None => {
                debug!(%line, "Ignoring unrecognized input");
                continue;
            }
        };
        if sent.is_err() {
            return;
        }
    }
    let _ = handle.quit();
}

/// Reads stdin on a dedicated thread so a pending read never holds up shutdown.
pub fn spawn_stdin_reader(handle: SessionHandle) -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("dr-nim-stdin".to_string())
        .spawn(move || forward_input(std::io::stdin().lock(), &handle))
}
