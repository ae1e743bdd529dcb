//! Remote state gateway
//!
//! The ledger is the only source of truth for a match. The client reaches it
//! through an encrypted-computation provider that must signal readiness once
//! before any other call is accepted.

mod memory;

pub use memory::{GatewayCall, InMemoryGateway};

use crate::core::{GuessRecord, Word};
use std::future::Future;
use thiserror::Error;

/// Errors reported by the remote side
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("encrypted computation is not ready")]
    NotReady,
    #[error("the match has not started")]
    MatchNotStarted,
    #[error("the match is already finished")]
    MatchFinished,
    #[error("guess rejected: {0}")]
    Rejected(String),
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

/// Async view of the ledger
///
/// Reads are idempotent and may be repeated freely. `submit_guess` and
/// `start_match` mutate remote state and must not be retried blindly: no
/// idempotency key is assumed.
pub trait RemoteStateGateway {
    /// Resolves once the encrypted-computation provider accepts calls
    fn await_computation_ready(&self) -> impl Future<Output = Result<(), GatewayError>>;

    fn is_match_started(&self) -> impl Future<Output = Result<bool, GatewayError>>;

    fn is_match_finished(&self) -> impl Future<Output = Result<bool, GatewayError>>;

    /// Full ordered history of accepted guesses
    ///
    /// `previous` is a hint that may be used to skip already-known entries,
    /// but the returned list is always complete.
    fn fetch_guess_history(
        &self,
        previous: &[GuessRecord],
    ) -> impl Future<Output = Result<Vec<GuessRecord>, GatewayError>>;

    fn submit_guess(&self, word: &Word) -> impl Future<Output = Result<(), GatewayError>>;

    fn start_match(&self) -> impl Future<Output = Result<(), GatewayError>>;
}
