//! Word list loading and membership
//!
//! Provides functions to load word lists from files or use embedded constants.

use super::{ALLOWED, ANSWERS};
use crate::core::Word;
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// Load words from a file, one per line
///
/// Blank lines and entries that are not valid words are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
///
/// # Examples
/// ```no_run
/// use sealed_wordle::wordlists::loader::load_from_file;
///
/// let words = load_from_file("data/answers.txt").unwrap();
/// println!("Loaded {} words", words.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Word>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading word list {}", path.display()))?;

    let words = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| Word::new(line).ok())
        .collect();

    Ok(words)
}

/// Convert an embedded string slice to words
#[must_use]
pub fn words_from_slice(slice: &[&str]) -> Vec<Word> {
    slice.iter().filter_map(|&s| Word::new(s).ok()).collect()
}

/// Accepted guesses of a fixed length
///
/// Solutions are always accepted guesses.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    length: usize,
    answers: Vec<Word>,
    accepted: FxHashSet<String>,
}

impl WordList {
    /// Build from candidate solutions and extra accepted guesses
    ///
    /// Words of any other length than `length` are dropped.
    #[must_use]
    pub fn new(length: usize, answers: Vec<Word>, extra: Vec<Word>) -> Self {
        let answers: Vec<Word> = answers.into_iter().filter(|w| w.len() == length).collect();
        let accepted = answers
            .iter()
            .chain(extra.iter().filter(|w| w.len() == length))
            .map(|w| w.text().to_string())
            .collect();

        Self {
            length,
            answers,
            accepted,
        }
    }

    /// The lists compiled into the binary
    #[must_use]
    pub fn embedded(length: usize) -> Self {
        Self::new(length, words_from_slice(ANSWERS), words_from_slice(ALLOWED))
    }

    /// Add every valid word from a file as an accepted guess
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn extend_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let before = self.accepted.len();
        for word in load_from_file(path)? {
            if word.len() == self.length {
                self.accepted.insert(word.text().to_string());
            }
        }
        Ok(self.accepted.len() - before)
    }

    #[must_use]
    pub fn contains(&self, word: &Word) -> bool {
        self.accepted.contains(word.text())
    }

    /// Candidate solutions, in epoch order
    #[must_use]
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    #[must_use]
    pub const fn word_length(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }
}
