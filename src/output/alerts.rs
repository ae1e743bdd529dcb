//! Transient messages shown to the player

use crate::controller::{ControllerError, Transition};
use crate::core::{GameProgressState, MatchStatus};
use rand::prelude::IndexedRandom;

/// Messages picked at random when the player wins
pub const WIN_MESSAGES: [&str; 3] = ["Great Job!", "Awesome", "Well done!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
    Info,
}

/// A non-persistent notice for the front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    text: String,
    kind: AlertKind,
}

impl Alert {
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: AlertKind::Success,
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: AlertKind::Error,
        }
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: AlertKind::Info,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn kind(&self) -> AlertKind {
        self.kind
    }

    /// Alert for a status change, if it deserves one
    ///
    /// Winning picks a congratulation; losing reveals the solution.
    #[must_use]
    pub fn for_transition(transition: Transition, progress: &GameProgressState) -> Option<Self> {
        if !transition.changed() {
            return None;
        }
        match transition.to {
            MatchStatus::Won => Some(Self::success(win_message())),
            MatchStatus::Lost => progress
                .revealed_solution()
                .map(|solution| Self::info(format!("The word was {}", solution.text().to_uppercase()))),
            MatchStatus::InProgress if transition.from == MatchStatus::NotStarted => {
                Some(Self::info("Match started"))
            }
            MatchStatus::InProgress | MatchStatus::NotStarted => None,
        }
    }
}

impl From<&ControllerError> for Alert {
    fn from(error: &ControllerError) -> Self {
        Self::error(error.to_string())
    }
}

#[must_use]
pub fn win_message() -> &'static str {
    WIN_MESSAGES.choose(&mut rand::rng()).copied().unwrap_or(WIN_MESSAGES[0])
}
