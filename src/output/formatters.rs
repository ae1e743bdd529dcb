//! Formatting utilities for terminal output

use crate::core::{Feedback, LetterVerdict, Word};
use colored::{ColoredString, Colorize};

/// One letter as a coloured tile
#[must_use]
pub fn tile(letter: &str, verdict: LetterVerdict) -> ColoredString {
    let text = format!(" {} ", letter.to_uppercase());
    match verdict {
        LetterVerdict::Correct => text.black().on_green().bold(),
        LetterVerdict::Present => text.black().on_yellow().bold(),
        LetterVerdict::Absent => text.white().on_bright_black(),
    }
}

/// A scored guess as a row of coloured tiles
#[must_use]
pub fn guess_row(word: &Word, feedback: &Feedback) -> String {
    word.letters()
        .iter()
        .zip(feedback.verdicts())
        .map(|(letter, &verdict)| tile(letter, verdict).to_string())
        .collect()
}

/// The in-progress row, padded with blanks up to `length`
#[must_use]
pub fn pending_row(letters: &[&str], length: usize) -> String {
    (0..length)
        .map(|i| {
            let letter = letters.get(i).map_or("_".to_string(), |l| l.to_uppercase());
            format!(" {letter} ")
        })
        .collect()
}

/// Attempts counter such as `3/6`
#[must_use]
pub fn attempts_label(used: usize, max: usize) -> String {
    format!("{used}/{max}")
}
