//! Match progress rebuilt from remote snapshots
//!
//! The local view of a match is never patched in place. Every reconciliation
//! pass hands [`GameProgressState::rebuild`] the full remote snapshot and the
//! status is derived from scratch.

use super::verdict::{Feedback, InvariantViolation, classify};
use super::Word;
use tracing::warn;

/// Derived state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl MatchStatus {
    /// Won or Lost
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::InProgress => "In progress",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }
}

/// Derive the status of a snapshot
///
/// Won is decided locally from the latest guess and does not wait for the
/// remote finished flag. Lost is only ever reported by the remote. A history
/// without the started flag still counts as started.
#[must_use]
pub fn derive_status(started: bool, finished: bool, latest: Option<&Feedback>) -> MatchStatus {
    if latest.is_some_and(Feedback::is_perfect) {
        MatchStatus::Won
    } else if finished {
        MatchStatus::Lost
    } else if !started && latest.is_none() {
        MatchStatus::NotStarted
    } else {
        MatchStatus::InProgress
    }
}

/// A guess as recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessRecord {
    word: Word,
    remote_feedback: Option<Feedback>,
}

impl GuessRecord {
    #[must_use]
    pub const fn new(word: Word) -> Self {
        Self {
            word,
            remote_feedback: None,
        }
    }

    /// A record carrying the ledger's own feedback for the guess
    #[must_use]
    pub const fn with_feedback(word: Word, feedback: Feedback) -> Self {
        Self {
            word,
            remote_feedback: Some(feedback),
        }
    }

    #[must_use]
    pub const fn word(&self) -> &Word {
        &self.word
    }

    #[must_use]
    pub const fn remote_feedback(&self) -> Option<&Feedback> {
        self.remote_feedback.as_ref()
    }
}

/// Everything the ledger reports about the current match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSnapshot {
    pub started: bool,
    pub finished: bool,
    pub guesses: Vec<GuessRecord>,
}

/// Local view of the current match
#[derive(Debug, Clone)]
pub struct GameProgressState {
    solution: Word,
    max_attempts: usize,
    snapshot: RemoteSnapshot,
    status: MatchStatus,
    divergent: Vec<usize>,
}

impl GameProgressState {
    /// Create an empty, not-started view for an epoch's solution
    #[must_use]
    pub fn new(solution: Word, max_attempts: usize) -> Self {
        Self {
            solution,
            max_attempts,
            snapshot: RemoteSnapshot::default(),
            status: MatchStatus::NotStarted,
            divergent: Vec::new(),
        }
    }

    /// Replace the view with a freshly fetched snapshot
    ///
    /// Only the latest guess is classified to derive the status. Earlier
    /// guesses are length-checked and compared with any remote feedback they
    /// carry; a disagreement is recorded in [`Self::divergent_guesses`] but
    /// local classification stays authoritative.
    ///
    /// # Errors
    /// Returns `InvariantViolation` if any recorded guess has the wrong
    /// length. The previous view is kept untouched in that case.
    pub fn rebuild(&mut self, snapshot: RemoteSnapshot) -> Result<MatchStatus, InvariantViolation> {
        let length = self.solution.len();
        if let Some(bad) = snapshot.guesses.iter().find(|g| g.word().len() != length) {
            return Err(InvariantViolation::LengthMismatch {
                guess: bad.word().len(),
                solution: length,
            });
        }

        let mut divergent = Vec::new();
        for (index, record) in snapshot.guesses.iter().enumerate() {
            if let Some(remote) = record.remote_feedback() {
                let local = classify(record.word(), &self.solution)?;
                if &local != remote {
                    warn!(
                        index,
                        guess = record.word().text(),
                        local = %local.to_emoji(),
                        remote = %remote.to_emoji(),
                        "remote feedback disagrees with local classification"
                    );
                    divergent.push(index);
                }
            }
        }

        let latest = snapshot
            .guesses
            .last()
            .map(|g| classify(g.word(), &self.solution))
            .transpose()?;
        let status = derive_status(snapshot.started, snapshot.finished, latest.as_ref());

        self.snapshot = snapshot;
        self.status = status;
        self.divergent = divergent;
        Ok(status)
    }

    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    #[must_use]
    pub fn guesses(&self) -> &[GuessRecord] {
        &self.snapshot.guesses
    }

    /// Verdicts for the guess at `index`, computed on demand
    #[must_use]
    pub fn verdicts(&self, index: usize) -> Option<Feedback> {
        let record = self.snapshot.guesses.get(index)?;
        classify(record.word(), &self.solution).ok()
    }

    #[must_use]
    pub fn solution_length(&self) -> usize {
        self.solution.len()
    }

    #[must_use]
    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.snapshot.guesses.len()
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_used())
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.snapshot.started || !self.snapshot.guesses.is_empty()
    }

    /// Remote finished flag as last observed
    #[must_use]
    pub const fn is_remote_finished(&self) -> bool {
        self.snapshot.finished
    }

    /// Indices of guesses whose remote feedback disagreed with local scoring
    #[must_use]
    pub fn divergent_guesses(&self) -> &[usize] {
        &self.divergent
    }

    /// The solution, but only once the match is over
    #[must_use]
    pub const fn revealed_solution(&self) -> Option<&Word> {
        if self.status.is_terminal() {
            Some(&self.solution)
        } else {
            None
        }
    }

    /// Guessed words in submission order
    #[must_use]
    pub fn guessed_words(&self) -> Vec<Word> {
        self.snapshot
            .guesses
            .iter()
            .map(|g| g.word().clone())
            .collect()
    }

    pub(crate) const fn solution(&self) -> &Word {
        &self.solution
    }
}
