//! What the session tells the view.

use tokio::sync::mpsc;

/// Receiver of session notifications.
///
/// Each call is made at most once per state transition, from the task
/// running the protocol.
pub trait StateObserver: Send {
    /// Shows the number of marbles left.
    fn display(&mut self, marbles: u8);
    /// Announces that the local player is to move.
    fn player_turn(&mut self);
    /// Announces that the opponent is to move.
    fn dim_turn(&mut self);
    /// Announces that the local player won.
    fn player_win(&mut self);
    /// Announces that the opponent won.
    fn dim_win(&mut self);
    /// Clears the message line.
    fn empty_text(&mut self);
    /// Lets the local player make moves.
    fn enable_buttons(&mut self);
    /// Stops the local player from making moves.
    fn disable_buttons(&mut self);
    /// Reports a fatal link failure.
    fn io_error(&mut self, message: &str);
}

/// A notification as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Marbles left.
    Display(u8),
    /// Local player to move.
    PlayerTurn,
    /// Opponent to move.
    DimTurn,
    /// Local player won.
    PlayerWin,
    /// Opponent won.
    DimWin,
    /// Message line cleared.
    EmptyText,
    /// Input enabled.
    EnableButtons,
    /// Input disabled.
    DisableButtons,
    /// Fatal link failure.
    IoError(String),
}

/// Observer that forwards every notification over a channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelObserver {
    /// Creates an observer and the receiver its notifications go to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, notification: Notification) {
        // A view that stopped listening has nothing left to show.
        let _ = self.tx.send(notification);
    }
}

impl StateObserver for ChannelObserver {
    fn display(&mut self, marbles: u8) {
        self.forward(Notification::Display(marbles));
    }

    fn player_turn(&mut self) {
        self.forward(Notification::PlayerTurn);
    }

    fn dim_turn(&mut self) {
        self.forward(Notification::DimTurn);
    }

    fn player_win(&mut self) {
        self.forward(Notification::PlayerWin);
    }

    fn dim_win(&mut self) {
        self.forward(Notification::DimWin);
    }

    fn empty_text(&mut self) {
        self.forward(Notification::EmptyText);
    }

    fn enable_buttons(&mut self) {
        self.forward(Notification::EnableButtons);
    }

    fn disable_buttons(&mut self) {
        self.forward(Notification::DisableButtons);
    }

    fn io_error(&mut self, message: &str) {
        self.forward(Notification::IoError(message.to_string()));
    }
}
