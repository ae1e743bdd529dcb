//! Letter verdicts and guess classification
//!
//! A guess is scored letter by letter against the solution:
//! - Correct: the letter sits in the same position in the solution
//! - Present: the letter appears elsewhere and has not been credited yet
//! - Absent: no uncredited copy of the letter remains
//!
//! Remote records may also carry the ledger's own feedback as two bitmasks
//! (bit `i` set = position `i`), decoded with [`Feedback::from_masks`].

use super::Word;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Verdict for one letter of a guess
///
/// Ordered so that a better verdict compares greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LetterVerdict {
    Absent,
    Present,
    Correct,
}

impl LetterVerdict {
    #[must_use]
    pub const fn to_emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

/// A broken caller contract, never a user-facing condition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("guess has {guess} letters but the solution has {solution}")]
    LengthMismatch { guess: usize, solution: usize },
}

/// Per-position verdicts for one guess
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feedback(Vec<LetterVerdict>);

/// Classify every letter of `guess` against `solution`
///
/// Duplicate letters are credited at most as many times as they occur in the
/// solution.
///
/// # Algorithm
/// 1. First pass: mark exact matches Correct and remove them from the pool
/// 2. Second pass: mark Present from whatever remains in the pool
///
/// # Errors
/// Returns `InvariantViolation::LengthMismatch` when the words differ in
/// length. Nothing is truncated.
///
/// # Examples
/// ```
/// use sealed_wordle::core::{classify, LetterVerdict::*, Word};
///
/// let guess = Word::new("erase").unwrap();
/// let solution = Word::new("speed").unwrap();
/// let feedback = classify(&guess, &solution).unwrap();
///
/// assert_eq!(feedback.verdicts(), [Present, Absent, Absent, Present, Present]);
/// ```
pub fn classify(guess: &Word, solution: &Word) -> Result<Feedback, InvariantViolation> {
    if guess.len() != solution.len() {
        return Err(InvariantViolation::LengthMismatch {
            guess: guess.len(),
            solution: solution.len(),
        });
    }

    let mut result = vec![LetterVerdict::Absent; guess.len()];
    let mut available = solution.letter_counts();

    // First pass: greens
    for (i, (g, s)) in guess.letters().iter().zip(solution.letters()).enumerate() {
        if g == s {
            result[i] = LetterVerdict::Correct;
            if let Some(count) = available.get_mut(g.as_str()) {
                *count = count.saturating_sub(1);
            }
        }
    }

    // Second pass: yellows from the remaining pool
    for (i, letter) in guess.letters().iter().enumerate() {
        if result[i] == LetterVerdict::Correct {
            continue;
        }
        if let Some(count) = available.get_mut(letter.as_str())
            && *count > 0
        {
            result[i] = LetterVerdict::Present;
            *count -= 1;
        }
    }

    Ok(Feedback(result))
}

impl Feedback {
    #[must_use]
    pub const fn new(verdicts: Vec<LetterVerdict>) -> Self {
        Self(verdicts)
    }

    #[must_use]
    pub fn verdicts(&self) -> &[LetterVerdict] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All letters Correct
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|&v| v == LetterVerdict::Correct)
    }

    #[must_use]
    pub fn count_correct(&self) -> usize {
        self.0
            .iter()
            .filter(|&&v| v == LetterVerdict::Correct)
            .count()
    }

    #[must_use]
    pub fn count_present(&self) -> usize {
        self.0
            .iter()
            .filter(|&&v| v == LetterVerdict::Present)
            .count()
    }

    /// Decode the ledger's bitmask form
    ///
    /// Correct wins when a position is set in both masks. Positions past bit
    /// 31 are Absent.
    #[must_use]
    pub fn from_masks(correct: u32, present: u32, length: usize) -> Self {
        let verdicts = (0..length)
            .map(|i| {
                let bit = u32::try_from(i).ok().and_then(|i| 1u32.checked_shl(i));
                match bit {
                    Some(bit) if correct & bit != 0 => LetterVerdict::Correct,
                    Some(bit) if present & bit != 0 => LetterVerdict::Present,
                    _ => LetterVerdict::Absent,
                }
            })
            .collect();
        Self(verdicts)
    }

    /// Encode as `(correct_mask, present_mask)`
    #[must_use]
    pub fn to_masks(&self) -> (u32, u32) {
        let mut correct = 0u32;
        let mut present = 0u32;
        for (i, verdict) in self.0.iter().enumerate().take(32) {
            let bit = 1u32 << i;
            match verdict {
                LetterVerdict::Correct => correct |= bit,
                LetterVerdict::Present => present |= bit,
                LetterVerdict::Absent => {}
            }
        }
        (correct, present)
    }

    /// Render as a string like "🟩🟨⬜🟩🟨"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|v| v.to_emoji()).collect()
    }

    /// Parse feedback from a string like "GY-GY" or "🟩🟨⬜🟩🟨"
    ///
    /// Accepts:
    /// - 'G'/'g'/🟩 for Correct
    /// - 'Y'/'y'/🟨 for Present
    /// - '-'/'_'/⬜ for Absent
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let verdicts = s
            .chars()
            .map(|ch| match ch {
                'G' | 'g' | '🟩' => Some(LetterVerdict::Correct),
                'Y' | 'y' | '🟨' => Some(LetterVerdict::Present),
                '-' | '_' | '⬜' => Some(LetterVerdict::Absent),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if verdicts.is_empty() {
            return None;
        }
        Some(Self(verdicts))
    }
}

impl std::str::FromStr for Feedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid feedback string: {s}"))
    }
}

/// Best verdict seen for each letter across `guesses`
///
/// Drives the on-screen keyboard: a letter once Correct stays Correct.
///
/// # Errors
/// Returns `InvariantViolation` if any guess differs in length from the
/// solution.
pub fn keyboard_statuses(
    guesses: &[Word],
    solution: &Word,
) -> Result<FxHashMap<String, LetterVerdict>, InvariantViolation> {
    let mut statuses: FxHashMap<String, LetterVerdict> = FxHashMap::default();

    for guess in guesses {
        let feedback = classify(guess, solution)?;
        for (letter, &verdict) in guess.letters().iter().zip(feedback.verdicts()) {
            statuses
                .entry(letter.clone())
                .and_modify(|best| *best = (*best).max(verdict))
                .or_insert(verdict);
        }
    }

    Ok(statuses)
}
