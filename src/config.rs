//! Game configuration and epoch selection
//!
//! The solution for a match is chosen once at startup from the game date and
//! handed to the controller explicitly.

use crate::core::Word;
use chrono::{Local, NaiveDate};
use std::time::Duration;
use thiserror::Error;

/// Letters per word in the daily game
pub const DEFAULT_WORD_LENGTH: usize = 5;

/// Rows on the board
pub const MAX_ATTEMPTS: usize = 6;

/// How often the front-ends re-read the ledger
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Errors resolving configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is before the first game on {first}", first = first_epoch_date())]
    BeforeFirstEpoch(NaiveDate),
    #[error("no answers available for this word length")]
    NoAnswers,
    #[error("word length must be between 1 and 32, got {0}")]
    InvalidWordLength(usize),
    #[error("max attempts must be at least 1")]
    NoAttempts,
}

/// Settings for one client session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub word_length: usize,
    pub max_attempts: usize,
    pub hard_mode: bool,
    pub poll_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_length: DEFAULT_WORD_LENGTH,
            max_attempts: MAX_ATTEMPTS,
            hard_mode: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl GameConfig {
    /// Check the bounds the rest of the crate relies on
    ///
    /// Word length is capped at 32 because remote feedback travels as `u32`
    /// bitmasks.
    ///
    /// # Errors
    /// Returns `ConfigError` for an out-of-range length or zero attempts.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.word_length == 0 || self.word_length > 32 {
            return Err(ConfigError::InvalidWordLength(self.word_length));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        Ok(())
    }
}

/// Date of the first game
///
/// # Panics
/// Never: the date is a valid constant.
#[must_use]
pub fn first_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid calendar date")
}

/// One day's match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Epoch {
    index: u64,
    date: NaiveDate,
}

impl Epoch {
    /// Epoch for a calendar date
    ///
    /// # Errors
    /// Returns `ConfigError::BeforeFirstEpoch` for dates before the first game.
    pub fn from_date(date: NaiveDate) -> Result<Self, ConfigError> {
        let days = (date - first_epoch_date()).num_days();
        let index = u64::try_from(days).map_err(|_| ConfigError::BeforeFirstEpoch(date))?;
        Ok(Self { index, date })
    }

    /// Epoch for the local calendar day
    ///
    /// # Errors
    /// Returns `ConfigError` if the system clock is before the first game.
    pub fn today() -> Result<Self, ConfigError> {
        Self::from_date(Local::now().date_naive())
    }

    #[must_use]
    pub const fn index(self) -> u64 {
        self.index
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.date
    }

    /// Pick this epoch's solution, cycling through `answers`
    ///
    /// # Errors
    /// Returns `ConfigError::NoAnswers` if `answers` is empty.
    pub fn solution(self, answers: &[Word]) -> Result<Word, ConfigError> {
        let len = answers.len() as u64;
        if len == 0 {
            return Err(ConfigError::NoAnswers);
        }
        let slot = usize::try_from(self.index % len).unwrap_or_default();
        Ok(answers[slot].clone())
    }
}
