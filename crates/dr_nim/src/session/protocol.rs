//! The turn-taking state machine.
//!
//! The protocol owns the [`GameState`] and is the only consumer of the
//! session queue. One event is handled per [`SessionProtocol::step`]:
//!
//! ```text
//! AwaitingLocalMove --local move--> AwaitingRemoteMove --remote move--> AwaitingLocalMove
//!         \                                  /
//!          `--- game over / link failure ---> Terminal
//! ```

use super::error::SessionError;
use super::event::{EventReceiver, SessionEvent, SessionHandle, WeakSessionHandle};
use super::observer::StateObserver;
use crate::transport::{PeerLink, PeerReader, PeerWriter, TransportError};
use dr_nim_core::{
    GameState, GameStatus, MatchRules, Move, OpponentStrategy, RuleEngine, Side,
};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Waiting for the local player.
    AwaitingLocalMove,
    /// Waiting for the peer or the computer.
    AwaitingRemoteMove,
    /// No more moves are accepted.
    Terminal,
}

/// Who sits across the table.
#[derive(Debug)]
pub enum Opponent {
    /// Dr. Nim, computed in-process.
    Computer(Box<dyn OpponentStrategy>),
    /// A peer at the other end of a link.
    Remote(PeerLink),
}

/// The opponent once the session owns it.
enum Seat {
    Computer(Box<dyn OpponentStrategy>),
    Remote {
        writer: PeerWriter,
        reader: Option<PeerReader>,
        pump: Option<JoinHandle<()>>,
    },
}

/// Drives one game from the opening to a terminal state.
pub struct SessionProtocol {
    state: GameState,
    engine: RuleEngine,
    phase: Phase,
    seat: Seat,
    observer: Box<dyn StateObserver>,
    handle: WeakSessionHandle,
    events: EventReceiver,
    read_timeout: Option<Duration>,
    deadline: Option<Instant>,
    think_delay: Duration,
    started: bool,
}

impl SessionProtocol {
    /// Creates a session for `rules` against `opponent`.
    ///
    /// `handle` and `events` must come from the same [`super::channel`].
    /// The protocol only keeps a weak handle, used to sequence the
    /// computer's moves and the peer's messages behind local intents; once
    /// the view has dropped every [`SessionHandle`] the session ends with
    /// [`SessionError::Closed`].
    #[instrument(skip_all, fields(marbles = rules.marbles, first = %rules.first))]
    pub fn new(
        rules: MatchRules,
        opponent: Opponent,
        observer: Box<dyn StateObserver>,
        handle: SessionHandle,
        events: EventReceiver,
    ) -> Self {
        let state = rules.opening_state();
        let phase = match state.turn() {
            Side::Local => Phase::AwaitingLocalMove,
            Side::Remote => Phase::AwaitingRemoteMove,
        };
        let seat = match opponent {
            Opponent::Computer(strategy) => Seat::Computer(strategy),
            Opponent::Remote(link) => {
                let (reader, writer) = link.split();
                Seat::Remote {
                    writer,
                    reader: Some(reader),
                    pump: None,
                }
            }
        };

        Self {
            state,
            engine: rules.engine(),
            phase,
            seat,
            observer,
            handle: handle.downgrade(),
            events,
            read_timeout: None,
            deadline: None,
            think_delay: Duration::ZERO,
            started: false,
        }
    }

    /// Fails the session when a network peer stays silent longer than `limit`.
    pub fn with_read_timeout(mut self, limit: Option<Duration>) -> Self {
        self.read_timeout = limit;
        self
    }

    /// Delays each computer move by `delay`.
    pub fn with_think_delay(mut self, delay: Duration) -> Self {
        self.think_delay = delay;
        self
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns a handle for submitting intents, unless the session is closed.
    pub fn handle(&self) -> Option<SessionHandle> {
        self.handle.upgrade()
    }

    /// Shows the opening position and starts listening to the opponent.
    ///
    /// Called by [`Self::step`] if needed; calling it again does nothing.
    #[instrument(skip(self), fields(marbles = self.state.marbles(), first = %self.state.turn()))]
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        info!("Session starting");

        if let Seat::Remote { reader, pump, .. } = &mut self.seat
            && let Some(reader) = reader.take()
        {
            *pump = Some(tokio::spawn(pump_moves(reader, self.handle.clone())));
        }

        self.observer.display(self.state.marbles());
        self.observer.empty_text();

        match self.phase {
            Phase::AwaitingLocalMove => {
                self.observer.player_turn();
                self.observer.enable_buttons();
            }
            Phase::AwaitingRemoteMove => {
                self.observer.dim_turn();
                self.observer.disable_buttons();
                self.schedule_computer_move();
            }
            Phase::Terminal => {}
        }
    }

    /// Handles the next queued event.
    pub async fn step(&mut self) -> Result<Phase, SessionError> {
        if self.phase == Phase::Terminal {
            return Ok(Phase::Terminal);
        }
        self.start();

        let event = match self.remote_deadline() {
            Some((at, limit)) => match tokio::time::timeout_at(at, self.events.recv()).await {
                Ok(event) => event,
                Err(_) => return self.fail(TransportError::Timeout(limit)),
            },
            None => self.events.recv().await,
        };

        let Some(event) = event else {
            warn!("Every session handle was dropped, ending session");
            self.observer.disable_buttons();
            self.phase = Phase::Terminal;
            self.stop_pump();
            return Err(SessionError::Closed);
        };
        debug!(?event, phase = ?self.phase, "Handling event");

        match event {
            SessionEvent::Local(mv) => self.on_local(mv).await,
            SessionEvent::Remote(mv) => self.on_remote(mv),
            SessionEvent::TransportFailed(err) => self.fail(err),
            SessionEvent::Quit => {
                info!(marbles = self.state.marbles(), "Local player left the table");
                self.observer.disable_buttons();
                self.phase = Phase::Terminal;
                self.stop_pump();
                Ok(Phase::Terminal)
            }
        }
    }

    /// Plays until the session is terminal.
    ///
    /// Returns the final status, which is still `InProgress` if the local
    /// player quit.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<GameStatus, SessionError> {
        self.start();
        while self.step().await? != Phase::Terminal {}
        info!(status = ?self.state.status(), "Session finished");
        Ok(self.state.status())
    }

    async fn on_local(&mut self, mv: Move) -> Result<Phase, SessionError> {
        if self.phase != Phase::AwaitingLocalMove {
            debug!(%mv, phase = ?self.phase, "Ignoring local move outside local turn");
            return Ok(self.phase);
        }

        let next = match self.engine.validate(&self.state, Side::Local, mv) {
            Ok(next) => next,
            Err(rejection) => {
                warn!(%mv, %rejection, "Ignoring illegal local move");
                return Ok(self.phase);
            }
        };
        self.state = next;
        info!(%mv, marbles = self.state.marbles(), "Local move applied");
        self.observer.display(self.state.marbles());

        let sent = match &mut self.seat {
            Seat::Remote { writer, .. } => writer.send_move(mv).await,
            Seat::Computer(_) => Ok(()),
        };
        if let Err(err) = sent {
            return self.fail(err);
        }

        if self.state.is_over() {
            return Ok(self.finish());
        }

        self.observer.dim_turn();
        self.observer.disable_buttons();
        self.phase = Phase::AwaitingRemoteMove;
        self.schedule_computer_move();
        Ok(self.phase)
    }

    fn on_remote(&mut self, mv: Move) -> Result<Phase, SessionError> {
        if self.phase != Phase::AwaitingRemoteMove {
            return self.fail(TransportError::OutOfTurn);
        }

        let next = match self.engine.validate(&self.state, Side::Remote, mv) {
            Ok(next) => next,
            Err(rejection) => return self.fail(TransportError::IllegalMove(rejection.to_string())),
        };
        self.state = next;
        self.deadline = None;
        info!(%mv, marbles = self.state.marbles(), "Opponent move applied");
        self.observer.display(self.state.marbles());

        if self.state.is_over() {
            return Ok(self.finish());
        }

        self.observer.player_turn();
        self.observer.enable_buttons();
        self.phase = Phase::AwaitingLocalMove;
        Ok(self.phase)
    }

    fn finish(&mut self) -> Phase {
        match self.state.status().winner() {
            Some(Side::Local) => self.observer.player_win(),
            Some(Side::Remote) => self.observer.dim_win(),
            None => {}
        }
        self.observer.disable_buttons();
        info!(status = ?self.state.status(), "Game over");
        self.phase = Phase::Terminal;
        self.stop_pump();
        Phase::Terminal
    }

    fn fail(&mut self, err: TransportError) -> Result<Phase, SessionError> {
        error!(error = %err, "Link to opponent failed, ending session");
        self.observer.io_error(&err.to_string());
        self.observer.disable_buttons();
        self.phase = Phase::Terminal;
        self.stop_pump();
        Err(SessionError::Transport(err))
    }

    /// Queues the computer's reply; the queue keeps it behind pending intents.
    fn schedule_computer_move(&self) {
        let Seat::Computer(strategy) = &self.seat else {
            return;
        };

        let mv = strategy.choose_move(&self.state);
        debug!(strategy = strategy.name(), %mv, "Computer move scheduled");

        let Some(handle) = self.handle.upgrade() else {
            debug!(%mv, "Session closed before computer move");
            return;
        };
        if self.think_delay.is_zero() {
            if let Err(err) = handle.enqueue(SessionEvent::Remote(mv)) {
                warn!(error = %err, "Dropping computer move");
            }
        } else {
            let delay = self.think_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(err) = handle.enqueue(SessionEvent::Remote(mv)) {
                    debug!(error = %err, "Session ended before computer move");
                }
            });
        }
    }

    /// Deadline for the peer's current move, fixed when first asked for.
    fn remote_deadline(&mut self) -> Option<(Instant, Duration)> {
        let limit = match (&self.seat, self.phase) {
            (Seat::Remote { .. }, Phase::AwaitingRemoteMove) => self.read_timeout?,
            _ => return None,
        };
        let at = *self.deadline.get_or_insert_with(|| Instant::now() + limit);
        Some((at, limit))
    }

    fn stop_pump(&mut self) {
        if let Seat::Remote { pump, .. } = &mut self.seat
            && let Some(task) = pump.take()
        {
            task.abort();
        }
    }
}

impl Drop for SessionProtocol {
    fn drop(&mut self) {
        self.stop_pump();
    }
}

impl std::fmt::Debug for SessionProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProtocol")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Forwards the peer's moves into the session queue until the link fails.
///
/// Holds only a weak handle, so a waiting read never keeps the session open.
#[instrument(skip_all)]
async fn pump_moves(mut reader: PeerReader, handle: WeakSessionHandle) {
    loop {
        let (event, done) = match reader.recv_move().await {
            Ok(mv) => (SessionEvent::Remote(mv), false),
            Err(err) => (SessionEvent::TransportFailed(err), true),
        };
        let sent = handle
            .upgrade()
            .is_some_and(|handle| handle.enqueue(event).is_ok());
        if !sent || done {
            debug!("Peer reader stopped");
            break;
        }
    }
}
