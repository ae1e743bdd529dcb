//! Simulated ledger
//!
//! Runs the remote side of a match in-process: readiness delay, per-call
//! latency, remote validation and feedback masks. It also records every call
//! so the call order can be asserted, and answers `NotReady` to anything
//! issued before readiness resolved.

use super::{GatewayError, RemoteStateGateway};
use crate::core::{Feedback, GuessRecord, Word, classify};
use crate::wordlists::WordList;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    AwaitReady,
    IsStarted,
    IsFinished,
    FetchHistory,
    SubmitGuess(String),
    StartMatch,
}

#[derive(Debug)]
struct Ledger {
    solution: Word,
    words: WordList,
    max_attempts: usize,
    ready_delay: Cell<Duration>,
    latency: Cell<Duration>,
    ready: Cell<bool>,
    started: Cell<bool>,
    complete: Cell<bool>,
    finished: Cell<bool>,
    hold_finish: Cell<bool>,
    history: RefCell<Vec<GuessRecord>>,
    calls: RefCell<Vec<GatewayCall>>,
    premature: Cell<usize>,
    next_ready_failure: RefCell<Option<GatewayError>>,
    next_submit_failure: RefCell<Option<GatewayError>>,
    next_read_failure: RefCell<Option<GatewayError>>,
}

/// In-process ledger shared by cheap clones
#[derive(Debug, Clone)]
pub struct InMemoryGateway {
    ledger: Rc<Ledger>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new(solution: Word, words: WordList, max_attempts: usize) -> Self {
        Self {
            ledger: Rc::new(Ledger {
                solution,
                words,
                max_attempts,
                ready_delay: Cell::new(Duration::ZERO),
                latency: Cell::new(Duration::ZERO),
                ready: Cell::new(false),
                started: Cell::new(false),
                complete: Cell::new(false),
                finished: Cell::new(false),
                hold_finish: Cell::new(false),
                history: RefCell::new(Vec::new()),
                calls: RefCell::new(Vec::new()),
                premature: Cell::new(0),
                next_ready_failure: RefCell::new(None),
                next_submit_failure: RefCell::new(None),
                next_read_failure: RefCell::new(None),
            }),
        }
    }

    /// Time the encrypted-computation provider takes to come up
    #[must_use]
    pub fn with_ready_delay(self, delay: Duration) -> Self {
        self.ledger.ready_delay.set(delay);
        self
    }

    /// Delay added to every call after readiness
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.ledger.latency.set(latency);
        self
    }

    /// Begin with the match already started
    #[must_use]
    pub fn already_started(self) -> Self {
        self.ledger.started.set(true);
        self
    }

    /// Every call received so far, in issue order
    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.ledger.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.ledger.calls.borrow_mut().clear();
    }

    /// Calls other than readiness received before readiness resolved
    #[must_use]
    pub fn premature_calls(&self) -> usize {
        self.ledger.premature.get()
    }

    /// Fail the next readiness handshake with `error`
    pub fn fail_next_ready(&self, error: GatewayError) {
        *self.ledger.next_ready_failure.borrow_mut() = Some(error);
    }

    /// Reject the next submission with `error`
    pub fn fail_next_submission(&self, error: GatewayError) {
        *self.ledger.next_submit_failure.borrow_mut() = Some(error);
    }

    /// Fail the next read (flags or history) with `error`
    pub fn fail_next_read(&self, error: GatewayError) {
        *self.ledger.next_read_failure.borrow_mut() = Some(error);
    }

    /// Delay publishing the finished flag after the match completes
    pub fn hold_finish_flag(&self, hold: bool) {
        self.ledger.hold_finish.set(hold);
        if !hold {
            self.release_finish_flag();
        }
    }

    /// Publish the finished flag if the match has completed
    pub fn release_finish_flag(&self) {
        if self.ledger.complete.get() {
            self.ledger.finished.set(true);
        }
    }

    /// Overwrite the remote history, as a reorg or dedup on the ledger would
    pub fn replace_history(&self, history: Vec<GuessRecord>) {
        *self.ledger.history.borrow_mut() = history;
    }

    /// Overwrite the remote flags
    pub fn set_flags(&self, started: bool, finished: bool) {
        self.ledger.started.set(started);
        self.ledger.finished.set(finished);
        self.ledger.complete.set(finished);
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.ledger.history.borrow().len()
    }

    fn record(&self, call: GatewayCall) -> Result<(), GatewayError> {
        debug!(?call, "gateway call");
        let premature = call != GatewayCall::AwaitReady && !self.ledger.ready.get();
        self.ledger.calls.borrow_mut().push(call);

        if premature {
            self.ledger.premature.set(self.ledger.premature.get() + 1);
            warn!("gateway called before encrypted computation was ready");
            return Err(GatewayError::NotReady);
        }
        Ok(())
    }

    async fn pause(&self) {
        let latency = self.ledger.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn take_read_failure(&self) -> Result<(), GatewayError> {
        match self.ledger.next_read_failure.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl RemoteStateGateway for InMemoryGateway {
    async fn await_computation_ready(&self) -> Result<(), GatewayError> {
        self.record(GatewayCall::AwaitReady)?;
        if !self.ledger.ready.get() {
            let delay = self.ledger.ready_delay.get();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if let Some(error) = self.ledger.next_ready_failure.borrow_mut().take() {
                warn!(%error, "encrypted computation failed to come up");
                return Err(error);
            }
            self.ledger.ready.set(true);
        }
        Ok(())
    }

    async fn is_match_started(&self) -> Result<bool, GatewayError> {
        self.record(GatewayCall::IsStarted)?;
        self.pause().await;
        self.take_read_failure()?;
        Ok(self.ledger.started.get())
    }

    async fn is_match_finished(&self) -> Result<bool, GatewayError> {
        self.record(GatewayCall::IsFinished)?;
        self.pause().await;
        self.take_read_failure()?;
        Ok(self.ledger.finished.get())
    }

    async fn fetch_guess_history(
        &self,
        previous: &[GuessRecord],
    ) -> Result<Vec<GuessRecord>, GatewayError> {
        self.record(GatewayCall::FetchHistory)?;
        self.pause().await;
        self.take_read_failure()?;

        let history = self.ledger.history.borrow().clone();
        debug!(known = previous.len(), total = history.len(), "history fetched");
        Ok(history)
    }

    async fn submit_guess(&self, word: &Word) -> Result<(), GatewayError> {
        self.record(GatewayCall::SubmitGuess(word.text().to_string()))?;
        self.pause().await;

        if let Some(error) = self.ledger.next_submit_failure.borrow_mut().take() {
            return Err(error);
        }
        if !self.ledger.started.get() {
            return Err(GatewayError::MatchNotStarted);
        }
        if self.ledger.complete.get() {
            return Err(GatewayError::MatchFinished);
        }
        if !self.ledger.words.contains(word) {
            return Err(GatewayError::Rejected(format!("'{word}' is not an accepted word")));
        }

        let feedback = classify(word, &self.ledger.solution)
            .map_err(|e| GatewayError::Rejected(e.to_string()))?;
        let (correct, present) = feedback.to_masks();

        let attempts = {
            let mut history = self.ledger.history.borrow_mut();
            history.push(GuessRecord::with_feedback(
                word.clone(),
                Feedback::from_masks(correct, present, word.len()),
            ));
            history.len()
        };

        if feedback.is_perfect() || attempts >= self.ledger.max_attempts {
            self.ledger.complete.set(true);
            if !self.ledger.hold_finish.get() {
                self.ledger.finished.set(true);
            }
        }
        Ok(())
    }

    async fn start_match(&self) -> Result<(), GatewayError> {
        self.record(GatewayCall::StartMatch)?;
        self.pause().await;
        self.ledger.started.set(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> InMemoryGateway {
        InMemoryGateway::new(Word::new("speed").unwrap(), WordList::embedded(5), 6)
    }

    fn word(s: &str) -> Word {
        Word::new(s).unwrap()
    }

    #[tokio::test]
    async fn calls_before_readiness_are_flagged() {
        let gateway = gateway();
        assert_eq!(gateway.is_match_started().await, Err(GatewayError::NotReady));
        assert_eq!(gateway.premature_calls(), 1);

        gateway.await_computation_ready().await.unwrap();
        assert_eq!(gateway.is_match_started().await, Ok(false));
        assert_eq!(gateway.premature_calls(), 1);
    }

    #[tokio::test]
    async fn submission_requires_started_match() {
        let gateway = gateway();
        gateway.await_computation_ready().await.unwrap();
        assert_eq!(
            gateway.submit_guess(&word("crane")).await,
            Err(GatewayError::MatchNotStarted)
        );

        gateway.start_match().await.unwrap();
        gateway.submit_guess(&word("crane")).await.unwrap();
        assert_eq!(gateway.history_len(), 1);
    }

    #[tokio::test]
    async fn winning_guess_finishes_the_match() {
        let gateway = gateway().already_started();
        gateway.await_computation_ready().await.unwrap();

        gateway.submit_guess(&word("speed")).await.unwrap();
        assert_eq!(gateway.is_match_finished().await, Ok(true));
        assert_eq!(
            gateway.submit_guess(&word("crane")).await,
            Err(GatewayError::MatchFinished)
        );
    }

    #[tokio::test]
    async fn held_finish_flag_lags_behind_the_win() {
        let gateway = gateway().already_started();
        gateway.await_computation_ready().await.unwrap();
        gateway.hold_finish_flag(true);

        gateway.submit_guess(&word("speed")).await.unwrap();
        assert_eq!(gateway.is_match_finished().await, Ok(false));

        gateway.release_finish_flag();
        assert_eq!(gateway.is_match_finished().await, Ok(true));
    }

    #[tokio::test]
    async fn history_carries_feedback_masks() {
        let gateway = gateway().already_started();
        gateway.await_computation_ready().await.unwrap();
        gateway.submit_guess(&word("erase")).await.unwrap();

        let history = gateway.fetch_guess_history(&[]).await.unwrap();
        let feedback = history[0].remote_feedback().unwrap();
        assert_eq!(feedback.to_emoji(), "🟨⬜⬜🟨🟨");
    }

    #[tokio::test]
    async fn remote_rejects_unknown_words() {
        let gateway = gateway().already_started();
        gateway.await_computation_ready().await.unwrap();
        assert!(matches!(
            gateway.submit_guess(&word("qzxvj")).await,
            Err(GatewayError::Rejected(_))
        ));
        assert_eq!(gateway.history_len(), 0);
    }

    #[tokio::test]
    async fn injected_failures_are_one_shot() {
        let gateway = gateway().already_started();
        gateway.await_computation_ready().await.unwrap();

        gateway.fail_next_read(GatewayError::Unavailable("rpc".into()));
        assert!(gateway.is_match_started().await.is_err());
        assert_eq!(gateway.is_match_started().await, Ok(true));

        gateway.fail_next_submission(GatewayError::Unavailable("relayer".into()));
        assert!(gateway.submit_guess(&word("crane")).await.is_err());
        assert!(gateway.submit_guess(&word("crane")).await.is_ok());
    }

    #[tokio::test]
    async fn failed_handshake_leaves_the_ledger_unready() {
        let gateway = gateway();
        gateway.fail_next_ready(GatewayError::Unavailable("coprocessor".into()));

        assert!(gateway.await_computation_ready().await.is_err());
        assert_eq!(gateway.is_match_started().await, Err(GatewayError::NotReady));

        gateway.await_computation_ready().await.unwrap();
        assert_eq!(gateway.is_match_started().await, Ok(false));
    }
}
