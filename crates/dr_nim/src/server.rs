//! Dr. Nim as a network server.
//!
//! Every accepted connection gets its own session in which Dr. Nim holds
//! the local seat and the challenger is the remote peer.

use crate::config::GameConfig;
use crate::session::{self, Opponent, SessionError, SessionProtocol, StrategyPlayer};
use crate::transport::{PeerLink, TransportError, handshake};
use dr_nim_core::{GameStatus, MatchRules, OptimalStrategy};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, error, info, info_span, instrument, warn};

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Source of challenger connections.
trait Acceptor {
    async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)>;
}

impl Acceptor for TcpListener {
    async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
        TcpListener::accept(self).await
    }
}

/// Plays one game against a connected challenger.
///
/// `rules` are from Dr. Nim's seat: `first = Local` means Dr. Nim opens.
#[instrument(skip(link, config), fields(peer = %link.peer()))]
pub async fn play_challenger(
    mut link: PeerLink,
    rules: MatchRules,
    config: &GameConfig,
) -> Result<GameStatus, SessionError> {
    handshake::within(config.read_timeout(), handshake::offer(&mut link, &rules)).await?;

    let (handle, events) = session::channel();
    let dr_nim = StrategyPlayer::new(
        Box::new(OptimalStrategy::new(rules.win_rule)),
        handle.clone(),
    );
    let mut protocol = SessionProtocol::new(
        rules,
        Opponent::Remote(link),
        Box::new(dr_nim),
        handle,
        events,
    )
    .with_read_timeout(config.read_timeout());

    protocol.run().await
}

/// Accepts challengers forever, one session each.
#[instrument(skip_all)]
pub async fn serve(
    listener: TcpListener,
    rules: MatchRules,
    config: GameConfig,
) -> Result<(), TransportError> {
    info!(addr = %listener.local_addr()?, "Dr. Nim is waiting for challengers");
    accept_loop(&listener, rules, &config).await;
    Ok(())
}

/// Runs one session per accepted connection; accept failures are retried.
async fn accept_loop(acceptor: &impl Acceptor, rules: MatchRules, config: &GameConfig) {
    loop {
        let (stream, addr) = match acceptor.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                error!(error = %err, "Accept failed, retrying");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let link = match PeerLink::from_tcp(stream) {
            Ok(link) => link,
            Err(err) => {
                warn!(%addr, error = %err, "Could not set up challenger link");
                continue;
            }
        };

        let config = config.clone();
        tokio::spawn(
            async move {
                match play_challenger(link, rules, &config).await {
                    Ok(status) => info!(?status, "Challenger session finished"),
                    Err(err) => warn!(error = %err, "Challenger session failed"),
                }
            }
            .instrument(info_span!("challenger", %addr)),
        );
    }
}

/// Waits for one guest and proposes `rules` to it.
#[instrument(skip(listener, config))]
pub async fn accept_guest(
    listener: &TcpListener,
    rules: &MatchRules,
    config: &GameConfig,
) -> Result<PeerLink, TransportError> {
    info!(addr = %listener.local_addr()?, "Waiting for an opponent to join");
    let (stream, _) = listener.accept().await?;
    let mut link = PeerLink::from_tcp(stream)?;
    handshake::within(config.read_timeout(), handshake::offer(&mut link, rules)).await?;
    Ok(link)
}

/// Joins a hosted game, returning the link and the agreed rules.
#[instrument(skip(config))]
pub async fn join_host(
    addr: &str,
    config: &GameConfig,
) -> Result<(PeerLink, MatchRules), TransportError> {
    let mut link = PeerLink::connect(addr).await?;
    let rules = handshake::within(config.read_timeout(), handshake::accept(&mut link)).await?;
    Ok((link, rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Listener whose first accepts fail as if the process ran out of descriptors.
    struct FlakyListener {
        inner: TcpListener,
        failures: Arc<AtomicUsize>,
    }

    impl Acceptor for FlakyListener {
        async fn accept(&self) -> std::io::Result<(TcpStream, SocketAddr)> {
            let left = self.failures.load(Ordering::SeqCst);
            if left > 0 {
                self.failures.store(left - 1, Ordering::SeqCst);
                return Err(std::io::Error::other("too many open files"));
            }
            self.inner.accept().await
        }
    }

    #[tokio::test]
    async fn accept_errors_do_not_stop_serving() {
        let inner = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = inner.local_addr().expect("addr").to_string();
        let failures = Arc::new(AtomicUsize::new(2));
        let listener = FlakyListener {
            inner,
            failures: Arc::clone(&failures),
        };
        let config = GameConfig::default();
        let rules = MatchRules::default();

        let server_config = config.clone();
        tokio::spawn(async move { accept_loop(&listener, rules, &server_config).await });

        let (_link, guest_rules) = join_host(&addr, &config).await.expect("still serving");
        assert_eq!(guest_rules, rules.mirrored());
        assert_eq!(failures.load(Ordering::SeqCst), 0);
    }
}
