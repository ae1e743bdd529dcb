//! In-progress guess buffer and local validation
//!
//! Everything here runs before the ledger is contacted. A guess that fails
//! these checks never costs an encrypted submission.

use super::progress::GameProgressState;
use super::verdict::{LetterVerdict, classify};
use super::word::grapheme_len;
use super::Word;
use crate::wordlists::WordList;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Why a guess was refused before reaching the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Not enough letters")]
    NotEnoughLetters,
    #[error("Word not found")]
    WordNotFound,
    #[error("The match has not started yet")]
    MatchNotStarted,
    #[error("A submission is already pending")]
    SubmissionPending,
    #[error("{0}")]
    HardMode(String),
}

/// The row the player is currently typing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in letters (graphemes)
    #[must_use]
    pub fn len(&self) -> usize {
        grapheme_len(&self.text)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a letter if the match still accepts input
    ///
    /// Refused when the row would exceed the solution length, the match is
    /// over, every attempt is used, or `c` is not a letter. A combining mark
    /// is accepted when it extends the last letter. Returns whether the
    /// buffer changed.
    pub fn append_char(&mut self, c: char, progress: &GameProgressState) -> bool {
        if progress.status().is_terminal()
            || progress.attempts_used() >= progress.max_attempts()
        {
            return false;
        }

        let mut candidate = self.text.clone();
        candidate.extend(c.to_lowercase());

        let extends_letter = !self.text.is_empty() && grapheme_len(&candidate) == self.len();
        if !c.is_alphabetic() && !extends_letter {
            return false;
        }

        if grapheme_len(&candidate) > progress.solution_length() {
            return false;
        }

        self.text = candidate;
        true
    }

    /// Remove the last letter, including every code point it is made of
    pub fn delete_char(&mut self) -> bool {
        match self.text.grapheme_indices(true).next_back() {
            Some((start, _)) => {
                self.text.truncate(start);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Run the local checks a submission must pass
    ///
    /// # Errors
    /// - `Rejection::NotEnoughLetters` when the row is not exactly full
    /// - `Rejection::WordNotFound` when the word is not in the word list
    /// - `Rejection::HardMode` when `hard_mode` is set and a revealed hint
    ///   from the latest guess is ignored
    pub fn validate(
        &self,
        progress: &GameProgressState,
        words: &WordList,
        hard_mode: bool,
    ) -> Result<Word, Rejection> {
        let length = progress.solution_length();
        if self.len() != length {
            return Err(Rejection::NotEnoughLetters);
        }

        let word = Word::with_length(self.text.as_str(), length)
            .map_err(|_| Rejection::WordNotFound)?;
        if !words.contains(&word) {
            return Err(Rejection::WordNotFound);
        }

        if hard_mode
            && let Some(latest) = progress.guesses().last()
            && let Some(message) = first_unused_reveal(&word, latest.word(), progress.solution())
        {
            return Err(Rejection::HardMode(message));
        }

        Ok(word)
    }
}

/// First hint from `previous` that `candidate` fails to reuse
///
/// Correct letters must stay in place; Present letters must appear somewhere,
/// one copy per hint.
#[must_use]
pub fn first_unused_reveal(candidate: &Word, previous: &Word, solution: &Word) -> Option<String> {
    let feedback = classify(previous, solution).ok()?;

    let mut required: Vec<&str> = Vec::new();
    for (i, (letter, &verdict)) in previous
        .letters()
        .iter()
        .zip(feedback.verdicts())
        .enumerate()
    {
        if verdict == LetterVerdict::Absent {
            continue;
        }
        required.push(letter);
        if verdict == LetterVerdict::Correct && candidate.letter_at(i) != Some(letter.as_str()) {
            return Some(format!(
                "Must use {} in position {}",
                letter.to_uppercase(),
                i + 1
            ));
        }
    }

    for letter in candidate.letters() {
        if let Some(pos) = required.iter().position(|r| *r == letter.as_str()) {
            required.remove(pos);
        }
    }

    required
        .first()
        .map(|letter| format!("Guess must contain {}", letter.to_uppercase()))
}
