//! Offline classification of one guess against one solution

use crate::core::{Feedback, Word, classify};
use anyhow::{Context, Result};

/// Result of classifying a guess
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub guess: Word,
    pub solution: Word,
    pub feedback: Feedback,
}

/// Classify `guess` against `solution` without touching the ledger
///
/// # Errors
///
/// Returns an error if either word is malformed or their lengths differ.
pub fn check_guess(guess: &str, solution: &str) -> Result<CheckResult> {
    let guess = Word::new(guess).with_context(|| format!("invalid guess '{guess}'"))?;
    let solution = Word::new(solution).with_context(|| format!("invalid solution '{solution}'"))?;
    let feedback = classify(&guess, &solution).context("cannot compare words")?;

    Ok(CheckResult {
        guess,
        solution,
        feedback,
    })
}
