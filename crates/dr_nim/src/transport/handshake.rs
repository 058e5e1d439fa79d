//! Agreeing on the match before the first move.
//!
//! The host sends `hello` with its rules; the guest checks the version,
//! adopts the rules mirrored to its own seat and answers `ready`.

use super::error::TransportError;
use super::link::PeerLink;
use super::wire::{PROTOCOL_VERSION, WireMessage, WireRules};
use dr_nim_core::MatchRules;
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Proposes `rules` to a freshly connected guest and waits for acceptance.
#[instrument(skip(link), fields(peer = %link.peer()))]
pub async fn offer(link: &mut PeerLink, rules: &MatchRules) -> Result<(), TransportError> {
    link.send(&WireMessage::Hello {
        version: PROTOCOL_VERSION,
        rules: WireRules::from_host(rules),
    })
    .await?;

    match link.recv().await? {
        WireMessage::Ready => {
            info!("Guest accepted the match");
            Ok(())
        }
        other => Err(TransportError::Handshake(format!(
            "expected ready, got {}",
            other.name()
        ))),
    }
}

/// Waits for the host's proposal and accepts it.
///
/// Returns the rules as seen from the guest's seat.
#[instrument(skip(link), fields(peer = %link.peer()))]
pub async fn accept(link: &mut PeerLink) -> Result<MatchRules, TransportError> {
    let (version, wire_rules) = match link.recv().await? {
        WireMessage::Hello { version, rules } => (version, rules),
        other => {
            return Err(TransportError::Handshake(format!(
                "expected hello, got {}",
                other.name()
            )));
        }
    };

    if version != PROTOCOL_VERSION {
        warn!(version, expected = PROTOCOL_VERSION, "Protocol version mismatch");
        return Err(TransportError::Handshake(format!(
            "host speaks version {}, we speak {}",
            version, PROTOCOL_VERSION
        )));
    }

    let rules = wire_rules.for_guest()?;
    link.send(&WireMessage::Ready).await?;
    info!(?rules, "Joined match");
    Ok(rules)
}

/// Runs a handshake step, failing with [`TransportError::Timeout`] after `limit`.
pub async fn within<T>(
    limit: Option<Duration>,
    step: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, step)
            .await
            .map_err(|_| TransportError::Timeout(limit))?,
        None => step.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dr_nim_core::{PassRule, Side, WinRule};

    #[tokio::test]
    async fn host_and_guest_agree() {
        let (mut host, mut guest) = PeerLink::pair();
        let rules = MatchRules {
            marbles: 11,
            first: Side::Remote,
            win_rule: WinRule::Misere,
            pass_rule: PassRule::Opening,
        };

        let (offered, accepted) = tokio::join!(offer(&mut host, &rules), accept(&mut guest));
        offered.expect("offer");
        let accepted = accepted.expect("accept");

        assert_eq!(accepted.marbles, 11);
        assert_eq!(accepted.first, Side::Local);
        assert_eq!(accepted.win_rule, WinRule::Misere);
        assert_eq!(accepted.pass_rule, PassRule::Opening);
    }

    #[tokio::test]
    async fn version_mismatch_rejected() {
        let (mut host, mut guest) = PeerLink::pair();
        host.send(&WireMessage::Hello {
            version: PROTOCOL_VERSION + 1,
            rules: WireRules::from_host(&MatchRules::default()),
        })
        .await
        .expect("send");

        assert!(matches!(
            accept(&mut guest).await,
            Err(TransportError::Handshake(_))
        ));
    }

    #[tokio::test]
    async fn silent_guest_times_out() {
        let (mut host, _guest) = PeerLink::pair();
        let limit = Duration::from_millis(20);
        let result = within(Some(limit), offer(&mut host, &MatchRules::default())).await;
        assert_eq!(result, Err(TransportError::Timeout(limit)));
    }
}
