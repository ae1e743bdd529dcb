//! Controller error types

use crate::core::{InvariantViolation, Rejection};
use crate::gateway::GatewayError;
use thiserror::Error;

/// Everything that can go wrong between a keystroke and the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    /// A remote call was attempted before the readiness handshake
    #[error("encrypted computation is not ready")]
    NotReady,

    /// The readiness handshake itself failed
    #[error("encrypted computation failed to start: {0}")]
    Readiness(GatewayError),

    /// Local validation refused the guess; nothing was sent
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// The ledger refused or lost a mutating call
    #[error("submission failed: {0}")]
    Submission(GatewayError),

    /// A read failed; the previous view is kept
    #[error("could not refresh game state: {0}")]
    Resync(GatewayError),

    /// A caller broke a length contract
    #[error("inconsistent game state: {0}")]
    Invariant(#[from] InvariantViolation),
}

impl ControllerError {
    /// Whether the player can fix this by editing the row
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
