//! Reading the ledger into a snapshot

use super::readiness::Ready;
use crate::core::{GuessRecord, RemoteSnapshot};
use crate::gateway::{GatewayError, RemoteStateGateway};
use tracing::debug;

/// Read flags and history after readiness
///
/// The finished and started flags are queried concurrently. History is only
/// fetched for a started match; a match that has not started has none.
///
/// # Errors
/// Returns the first gateway error; no partial snapshot is produced.
pub async fn fetch_snapshot<G: RemoteStateGateway>(
    gateway: &G,
    _ready: Ready,
    previous: &[GuessRecord],
) -> Result<RemoteSnapshot, GatewayError> {
    let (finished, started) = tokio::join!(gateway.is_match_finished(), gateway.is_match_started());
    let (finished, started) = (finished?, started?);

    let guesses = if started {
        gateway.fetch_guess_history(previous).await?
    } else {
        Vec::new()
    };

    debug!(started, finished, guesses = guesses.len(), "snapshot fetched");
    Ok(RemoteSnapshot {
        started,
        finished,
        guesses,
    })
}

/// Permission to run one poll, stamped with the controller generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTicket {
    pub(super) ready: Ready,
    pub(super) generation: u64,
}

/// Result of a poll, handed back to the controller
#[derive(Debug)]
pub struct SyncOutcome {
    pub(super) ticket: SyncTicket,
    pub(super) result: Result<RemoteSnapshot, GatewayError>,
}

impl SyncOutcome {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
