//! Mutating calls and the re-fetch that follows them

use super::readiness::Ready;
use super::sync::fetch_snapshot;
use crate::core::{GuessRecord, RemoteSnapshot, Word};
use crate::gateway::{GatewayError, RemoteStateGateway};
use tracing::{debug, warn};

/// A call that changes the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    Guess(Word),
    StartMatch,
}

impl RemoteAction {
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Guess(_) => "guess",
            Self::StartMatch => "start",
        }
    }
}

/// An accepted action waiting to be sent
///
/// Holding one means the controller has marked a submission in flight;
/// it must come back through `finish_submission`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub(super) action: RemoteAction,
    pub(super) ready: Ready,
}

impl PendingSubmission {
    #[must_use]
    pub const fn action(&self) -> &RemoteAction {
        &self.action
    }
}

/// Where a submission failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The mutating call itself failed; the ledger is unchanged
    Rejected(GatewayError),
    /// The call went through but the re-fetch failed
    Resync(GatewayError),
}

#[derive(Debug)]
pub struct SubmissionOutcome {
    pub(super) action: RemoteAction,
    pub(super) result: Result<RemoteSnapshot, SubmissionError>,
}

impl SubmissionOutcome {
    #[must_use]
    pub const fn action(&self) -> &RemoteAction {
        &self.action
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Send one action, then read back the whole ledger
///
/// Nothing is retried. The re-fetch happens only after the mutating call
/// has succeeded, so the snapshot always reflects it.
pub async fn run_submission<G: RemoteStateGateway>(
    gateway: &G,
    pending: PendingSubmission,
    previous: Vec<GuessRecord>,
) -> SubmissionOutcome {
    let PendingSubmission { action, ready } = pending;

    let sent = match &action {
        RemoteAction::Guess(word) => {
            debug!(guess = word.text(), "submitting guess");
            gateway.submit_guess(word).await
        }
        RemoteAction::StartMatch => {
            debug!("starting match");
            gateway.start_match().await
        }
    };

    if let Err(error) = sent {
        warn!(action = action.describe(), %error, "remote call failed");
        return SubmissionOutcome {
            action,
            result: Err(SubmissionError::Rejected(error)),
        };
    }

    let result = fetch_snapshot(gateway, ready, &previous)
        .await
        .map_err(SubmissionError::Resync);
    SubmissionOutcome { action, result }
}
