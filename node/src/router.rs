//! The deployed-process transport. Real peer-to-peer networking is out of scope here; this
//! module exists only to give a configured peer list somewhere to fail predictably instead of
//! silently hanging, so the binary's exit codes stay meaningful end to end.

use async_trait::async_trait;
use mpc_core::{Envelope, Router, RouterError};

/// A [Router] for a deployment with real peer addresses configured.
///
/// Every call fails immediately with [RouterError::PeerUnreachable]: there is no actual
/// connection behind `peers`, since wiring up TLS/authenticated transport is explicitly not
/// this crate's job. A future transport implementation replaces this type wholesale; until
/// then, a node configured with a non-empty `peers` list reports the unreachable peer and
/// exits with the code reserved for it instead of blocking forever on a socket that was never
/// opened.
pub struct NetworkRouter {
    peers: Vec<String>,
}

impl NetworkRouter {
    /// Builds a router over the given peer addresses, indexed by party id.
    pub fn new(peers: Vec<String>) -> Self {
        Self { peers }
    }
}

#[async_trait]
impl Router for NetworkRouter {
    async fn send(&self, dest: usize, _envelope: Envelope) -> Result<(), RouterError> {
        let _ = self.peers.get(dest);
        Err(RouterError::PeerUnreachable(dest))
    }

    async fn recv(&self) -> Result<(usize, Envelope), RouterError> {
        Err(RouterError::PeerUnreachable(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_lib::GF;
    use mpc_core::Envelope as Env;

    #[tokio::test]
    async fn send_always_fails_unreachable() {
        let router = NetworkRouter::new(vec!["10.0.0.1:9000".to_string(), "10.0.0.2:9000".to_string()]);
        let result = router.send(1, Env::single(0, GF::zero())).await;
        assert_eq!(result, Err(RouterError::PeerUnreachable(1)));
    }

    #[tokio::test]
    async fn recv_fails_unreachable() {
        let router = NetworkRouter::new(vec![]);
        let result = router.recv().await;
        assert!(matches!(result, Err(RouterError::PeerUnreachable(_))));
    }
}
