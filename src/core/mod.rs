//! Core domain types for the guessing game
//!
//! Pure, synchronous and free of I/O: words, verdicts, the rebuilt match
//! view and the input row. The async side lives in `controller`.

mod input;
mod progress;
mod verdict;
mod word;

pub use input::{InputBuffer, Rejection, first_unused_reveal};
pub use progress::{GameProgressState, GuessRecord, MatchStatus, RemoteSnapshot, derive_status};
pub use verdict::{Feedback, InvariantViolation, LetterVerdict, classify, keyboard_statuses};
pub use word::{Word, WordError, grapheme_len};
