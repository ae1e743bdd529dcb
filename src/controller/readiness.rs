//! One-shot readiness of the encrypted-computation provider

use crate::gateway::{GatewayError, RemoteStateGateway};
use std::rc::Rc;
use tokio::sync::OnceCell;
use tracing::info;

/// Proof that readiness has resolved
///
/// Only [`Readiness::establish`] creates one, and every helper that talks to
/// the gateway after the handshake takes it by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    _private: (),
}

/// Shared handle on the readiness signal
///
/// Set at most once and never reset. Clones observe the same signal; the
/// binary creates a single handle for the whole process.
#[derive(Debug, Clone, Default)]
pub struct Readiness {
    signal: Rc<OnceCell<Ready>>,
}

impl Readiness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(&self) -> Option<Ready> {
        self.signal.get().copied()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.signal.initialized()
    }

    /// Wait for the provider, once
    ///
    /// Concurrent callers share a single `await_computation_ready` call. Once
    /// resolved, later calls return immediately without touching the gateway.
    ///
    /// # Errors
    /// Returns the gateway error if the provider fails to come up; the signal
    /// stays unset and a later call tries again.
    pub async fn establish<G: RemoteStateGateway>(&self, gateway: &G) -> Result<Ready, GatewayError> {
        let ready = self
            .signal
            .get_or_try_init(|| async {
                gateway.await_computation_ready().await?;
                info!("encrypted computation ready");
                Ok::<_, GatewayError>(Ready { _private: () })
            })
            .await?;
        Ok(*ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Word;
    use crate::gateway::{GatewayCall, InMemoryGateway};
    use crate::wordlists::WordList;

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::new(Word::new("speed").unwrap(), WordList::embedded(5), 6)
    }

    #[tokio::test]
    async fn establish_calls_gateway_once() {
        let gateway = gateway();
        let readiness = Readiness::new();
        assert!(readiness.token().is_none());

        readiness.establish(&gateway).await.unwrap();
        readiness.establish(&gateway).await.unwrap();

        assert!(readiness.is_ready());
        assert_eq!(gateway.calls(), [GatewayCall::AwaitReady]);
    }

    #[tokio::test]
    async fn clones_share_the_signal() {
        let gateway = gateway();
        let readiness = Readiness::new();
        let other = readiness.clone();

        readiness.establish(&gateway).await.unwrap();
        assert!(other.token().is_some());
    }

    #[tokio::test]
    async fn failed_handshake_is_retried() {
        let gateway = gateway();
        let readiness = Readiness::new();
        gateway.fail_next_ready(GatewayError::Unavailable("coprocessor".into()));

        assert!(readiness.establish(&gateway).await.is_err());
        assert!(!readiness.is_ready());

        readiness.establish(&gateway).await.unwrap();
        assert!(readiness.is_ready());
        assert_eq!(
            gateway.calls(),
            [GatewayCall::AwaitReady, GatewayCall::AwaitReady]
        );
    }
}
