//! Word representation
//!
//! A Word stores its text split into grapheme clusters. Every length check in
//! the crate counts graphemes, so a letter made of several code points still
//! occupies a single tile.

use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// A guessable word with its letters split into grapheme clusters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    text: String,
    letters: Vec<String>,
}

/// Error type for invalid words
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("Word must not be empty")]
    Empty,
    #[error("Word must be exactly {expected} letters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("Word contains invalid characters")]
    InvalidCharacters,
}

/// Count the grapheme clusters in `text`
#[must_use]
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

impl Word {
    /// Create a new Word from a string
    ///
    /// The text is lowercased. Every grapheme must start with an alphabetic
    /// character.
    ///
    /// # Errors
    /// Returns `WordError` if the text is empty or contains non-letters.
    ///
    /// # Examples
    /// ```
    /// use sealed_wordle::core::Word;
    ///
    /// let word = Word::new("CRANE").unwrap();
    /// assert_eq!(word.text(), "crane");
    /// assert_eq!(word.len(), 5);
    ///
    /// assert!(Word::new("sh0rt").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, WordError> {
        let text: String = text.into().to_lowercase();

        if text.is_empty() {
            return Err(WordError::Empty);
        }

        let letters: Vec<String> = text.graphemes(true).map(str::to_owned).collect();

        let all_letters = letters
            .iter()
            .all(|g| g.chars().next().is_some_and(char::is_alphabetic));
        if !all_letters {
            return Err(WordError::InvalidCharacters);
        }

        Ok(Self { text, letters })
    }

    /// Create a Word that must have exactly `length` letters
    ///
    /// # Errors
    /// Returns `WordError::InvalidLength` on a length mismatch, or any error
    /// from [`Word::new`].
    pub fn with_length(text: impl Into<String>, length: usize) -> Result<Self, WordError> {
        let word = Self::new(text)?;
        if word.len() != length {
            return Err(WordError::InvalidLength {
                expected: length,
                actual: word.len(),
            });
        }
        Ok(word)
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The letters of the word in order
    #[inline]
    #[must_use]
    pub fn letters(&self) -> &[String] {
        &self.letters
    }

    /// Number of letters (graphemes), not bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always false: construction rejects empty text
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn letter_at(&self, position: usize) -> Option<&str> {
        self.letters.get(position).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn has_letter(&self, letter: &str) -> bool {
        self.letters.iter().any(|l| l == letter)
    }

    /// Occurrence count of each letter, used for duplicate-aware scoring
    pub(crate) fn letter_counts(&self) -> FxHashMap<&str, usize> {
        let mut counts = FxHashMap::default();
        for letter in &self.letters {
            *counts.entry(letter.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
