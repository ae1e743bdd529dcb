//! Reconciliation between the local view and the ledger
//!
//! The controller owns the progress state and the input buffer. Every remote
//! mutation is followed by a full re-read, and the local view is rebuilt from
//! that read rather than patched.
//!
//! Remote work is split so a front-end can keep handling keys while it runs:
//! a synchronous `prepare_*` or `begin_sync` step, a `'static` future that
//! owns a gateway clone, and a synchronous `finish_*` step that applies the
//! result. The async convenience methods chain the three.

mod error;
mod readiness;
mod submission;
mod sync;

pub use error::ControllerError;
pub use readiness::{Readiness, Ready};
pub use submission::{
    PendingSubmission, RemoteAction, SubmissionError, SubmissionOutcome, run_submission,
};
pub use sync::{SyncOutcome, SyncTicket, fetch_snapshot};

use crate::config::GameConfig;
use crate::core::{
    GameProgressState, InputBuffer, LetterVerdict, MatchStatus, Rejection, RemoteSnapshot, Word,
    keyboard_statuses,
};
use crate::gateway::RemoteStateGateway;
use crate::wordlists::WordList;
use rustc_hash::FxHashMap;
use std::future::Future;
use tracing::{debug, info, warn};

/// Status before and after applying a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: MatchStatus,
    pub to: MatchStatus,
}

impl Transition {
    #[must_use]
    pub const fn steady(status: MatchStatus) -> Self {
        Self {
            from: status,
            to: status,
        }
    }

    #[must_use]
    pub fn changed(self) -> bool {
        self.from != self.to
    }
}

/// What a submit request turned into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The match is over; nothing was sent
    Ignored,
    /// The ledger accepted the call and the view was rebuilt
    Accepted(Transition),
}

pub struct ReconciliationController<G> {
    gateway: G,
    readiness: Readiness,
    progress: GameProgressState,
    input: InputBuffer,
    words: WordList,
    config: GameConfig,
    in_flight: bool,
    generation: u64,
}

impl<G: RemoteStateGateway + Clone> ReconciliationController<G> {
    #[must_use]
    pub fn new(
        gateway: G,
        readiness: Readiness,
        solution: Word,
        words: WordList,
        config: GameConfig,
    ) -> Self {
        let progress = GameProgressState::new(solution, config.max_attempts);
        Self {
            gateway,
            readiness,
            progress,
            input: InputBuffer::new(),
            words,
            config,
            in_flight: false,
            generation: 0,
        }
    }

    /// Await readiness, then read the ledger
    ///
    /// # Errors
    /// `ControllerError::Readiness` if the provider never comes up, otherwise
    /// whatever [`Self::reconcile`] returns.
    pub async fn initialize(&mut self) -> Result<Transition, ControllerError> {
        self.readiness
            .establish(&self.gateway)
            .await
            .map_err(ControllerError::Readiness)?;
        self.reconcile().await
    }

    /// Re-read flags and history and rebuild the view
    ///
    /// # Errors
    /// `ControllerError::NotReady` before initialization, `Resync` when a read
    /// fails (the previous view is kept), `Invariant` for malformed history.
    pub async fn reconcile(&mut self) -> Result<Transition, ControllerError> {
        let ticket = self.begin_sync()?;
        let outcome = self.sync_task(ticket).await;
        Ok(self
            .finish_sync(outcome)?
            .unwrap_or_else(|| Transition::steady(self.status())))
    }

    /// # Errors
    /// `ControllerError::NotReady` before initialization.
    pub fn begin_sync(&self) -> Result<SyncTicket, ControllerError> {
        Ok(SyncTicket {
            ready: self.ready()?,
            generation: self.generation,
        })
    }

    /// Poll future that borrows nothing from the controller
    pub fn sync_task(&self, ticket: SyncTicket) -> impl Future<Output = SyncOutcome> + use<G> {
        let gateway = self.gateway.clone();
        let previous = self.progress.guesses().to_vec();
        async move {
            let result = fetch_snapshot(&gateway, ticket.ready, &previous).await;
            SyncOutcome { ticket, result }
        }
    }

    /// Apply a poll result
    ///
    /// Returns `Ok(None)` when the result is stale: a submission started or
    /// finished since the poll began, so its snapshot may predate it.
    ///
    /// # Errors
    /// `Resync` if the poll failed, `Invariant` for malformed history.
    pub fn finish_sync(&mut self, outcome: SyncOutcome) -> Result<Option<Transition>, ControllerError> {
        if outcome.ticket.generation != self.generation || self.in_flight {
            debug!(
                ticket = outcome.ticket.generation,
                current = self.generation,
                "discarding stale snapshot"
            );
            return Ok(None);
        }

        match outcome.result {
            Ok(snapshot) => self.apply_snapshot(snapshot).map(Some),
            Err(error) => {
                warn!(%error, "failed to refresh game state");
                Err(ControllerError::Resync(error))
            }
        }
    }

    /// Append a typed letter to the current row
    pub fn append_char(&mut self, c: char) -> bool {
        self.input.append_char(c, &self.progress)
    }

    pub fn delete_char(&mut self) -> bool {
        self.input.delete_char()
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Validate the current row and claim the submission slot
    ///
    /// Returns `Ok(None)` when the match is already Won or Lost. On success
    /// the returned submission must be run and handed back to
    /// [`Self::finish_submission`].
    ///
    /// # Errors
    /// `Rejected` for any local validation failure, `NotReady` before
    /// initialization. No remote call is made in either case.
    pub fn prepare_submission(&mut self) -> Result<Option<PendingSubmission>, ControllerError> {
        if self.progress.status().is_terminal() {
            debug!(status = self.progress.status().name(), "submit ignored");
            return Ok(None);
        }
        if self.in_flight {
            return Err(Rejection::SubmissionPending.into());
        }
        if !self.progress.is_started() {
            return Err(Rejection::MatchNotStarted.into());
        }

        let word = self
            .input
            .validate(&self.progress, &self.words, self.config.hard_mode)
            .inspect_err(|rejection| debug!(%rejection, input = self.input.text(), "guess rejected"))?;
        let ready = self.ready()?;
        Ok(Some(self.claim(RemoteAction::Guess(word), ready)))
    }

    /// Claim the submission slot for starting the match
    ///
    /// Returns `Ok(None)` if the match is already started.
    ///
    /// # Errors
    /// `Rejected(SubmissionPending)` while another call is in flight,
    /// `NotReady` before initialization.
    pub fn prepare_start(&mut self) -> Result<Option<PendingSubmission>, ControllerError> {
        if self.in_flight {
            return Err(Rejection::SubmissionPending.into());
        }
        let ready = self.ready()?;
        if self.progress.is_started() {
            debug!("start ignored: match already started");
            return Ok(None);
        }
        Ok(Some(self.claim(RemoteAction::StartMatch, ready)))
    }

    /// Submission future that borrows nothing from the controller
    pub fn submission_task(
        &self,
        pending: PendingSubmission,
    ) -> impl Future<Output = SubmissionOutcome> + use<G> {
        let gateway = self.gateway.clone();
        let previous = self.progress.guesses().to_vec();
        async move { run_submission(&gateway, pending, previous).await }
    }

    /// Release the submission slot and apply the result
    ///
    /// The input row is cleared only when the guess reached the ledger and
    /// the row still holds that guess.
    ///
    /// # Errors
    /// `Submission` if the ledger refused the call (input kept), `Resync` if
    /// it accepted but the re-read failed, `Invariant` for malformed history.
    pub fn finish_submission(
        &mut self,
        outcome: SubmissionOutcome,
    ) -> Result<SubmitOutcome, ControllerError> {
        self.in_flight = false;
        self.generation += 1;

        let SubmissionOutcome { action, result } = outcome;
        match result {
            Err(SubmissionError::Rejected(error)) => Err(ControllerError::Submission(error)),
            Err(SubmissionError::Resync(error)) => {
                self.clear_submitted(&action);
                warn!(%error, "submitted but failed to refresh game state");
                Err(ControllerError::Resync(error))
            }
            Ok(snapshot) => {
                self.clear_submitted(&action);
                self.apply_snapshot(snapshot).map(SubmitOutcome::Accepted)
            }
        }
    }

    /// Validate, submit and rebuild in one go
    ///
    /// # Errors
    /// See [`Self::prepare_submission`] and [`Self::finish_submission`].
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ControllerError> {
        let Some(pending) = self.prepare_submission()? else {
            return Ok(SubmitOutcome::Ignored);
        };
        let outcome = self.submission_task(pending).await;
        self.finish_submission(outcome)
    }

    /// Start the match on the ledger and rebuild
    ///
    /// # Errors
    /// See [`Self::prepare_start`] and [`Self::finish_submission`].
    pub async fn start_match(&mut self) -> Result<SubmitOutcome, ControllerError> {
        let Some(pending) = self.prepare_start()? else {
            return Ok(SubmitOutcome::Ignored);
        };
        let outcome = self.submission_task(pending).await;
        self.finish_submission(outcome)
    }

    fn ready(&self) -> Result<Ready, ControllerError> {
        self.readiness.token().ok_or(ControllerError::NotReady)
    }

    fn claim(&mut self, action: RemoteAction, ready: Ready) -> PendingSubmission {
        self.in_flight = true;
        self.generation += 1;
        PendingSubmission { action, ready }
    }

    fn clear_submitted(&mut self, action: &RemoteAction) {
        if let RemoteAction::Guess(word) = action
            && self.input.text() == word.text()
        {
            self.input.clear();
        }
    }

    fn apply_snapshot(&mut self, snapshot: RemoteSnapshot) -> Result<Transition, ControllerError> {
        let from = self.progress.status();
        let to = self.progress.rebuild(snapshot)?;
        if from != to {
            info!(from = from.name(), to = to.name(), "match status changed");
        }
        Ok(Transition { from, to })
    }
}

impl<G> ReconciliationController<G> {
    #[must_use]
    pub const fn progress(&self) -> &GameProgressState {
        &self.progress
    }

    #[must_use]
    pub const fn input(&self) -> &InputBuffer {
        &self.input
    }

    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.progress.status()
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub const fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    /// Whether a submission or start call is outstanding
    #[must_use]
    pub const fn is_submission_pending(&self) -> bool {
        self.in_flight
    }

    /// Best verdict per letter across all guesses
    ///
    /// # Errors
    /// `Invariant` if a stored guess has the wrong length.
    pub fn keyboard(&self) -> Result<FxHashMap<String, LetterVerdict>, ControllerError> {
        Ok(keyboard_statuses(
            &self.progress.guessed_words(),
            self.progress.solution(),
        )?)
    }
}
