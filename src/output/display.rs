//! Display functions for command results

use super::alerts::{Alert, AlertKind};
use super::formatters::{attempts_label, guess_row, pending_row};
use crate::core::{Feedback, GameProgressState, InputBuffer, MatchStatus, Word};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

/// Print the guess grid, the current row and the empty rows below it
pub fn print_board(progress: &GameProgressState, input: Option<&InputBuffer>) {
    let length = progress.solution_length();

    for (index, record) in progress.guesses().iter().enumerate() {
        if let Some(feedback) = progress.verdicts(index) {
            let marker = if progress.divergent_guesses().contains(&index) {
                " ⚠".yellow().to_string()
            } else {
                String::new()
            };
            println!("  {}{marker}", guess_row(record.word(), &feedback));
        }
    }

    let mut rows = progress.guesses().len();
    if let Some(input) = input
        && !progress.status().is_terminal()
        && rows < progress.max_attempts()
    {
        let letters: Vec<&str> = input.text().graphemes(true).collect();
        println!("  {}", pending_row(&letters, length).bold());
        rows += 1;
    }

    for _ in rows..progress.max_attempts() {
        println!("  {}", pending_row(&[], length).bright_black());
    }
}

/// Print a one-shot summary of the match
pub fn print_status_report(progress: &GameProgressState, epoch: u64) {
    println!("\n{}", "═".repeat(40).cyan());
    println!(
        " {} #{epoch} ",
        "SEALED WORDLE".bright_cyan().bold(),
    );
    println!("{}", "═".repeat(40).cyan());

    println!(
        "\n   Status:    {}",
        status_label(progress.status())
    );
    println!(
        "   Attempts:  {}",
        attempts_label(progress.attempts_used(), progress.max_attempts())
    );
    if !progress.divergent_guesses().is_empty() {
        println!(
            "   {}",
            format!(
                "Remote feedback disagreed on {} guess(es)",
                progress.divergent_guesses().len()
            )
            .yellow()
        );
    }
    println!();

    print_board(progress, None);

    if let Some(solution) = progress.revealed_solution() {
        println!("\n   Solution:  {}", solution.text().to_uppercase().bright_yellow().bold());
    }
    println!();
}

/// Print an offline classification
pub fn print_check_result(guess: &Word, solution: &Word, feedback: &Feedback) {
    println!(
        "\n{} vs {}",
        guess.text().to_uppercase().bright_yellow().bold(),
        solution.text().to_uppercase().bright_yellow().bold()
    );
    println!("  {}", guess_row(guess, feedback));
    println!("  {}", feedback.to_emoji());
    println!(
        "  {} correct, {} present\n",
        feedback.count_correct(),
        feedback.count_present()
    );
}

pub fn print_alert(alert: &Alert) {
    match alert.kind() {
        AlertKind::Success => println!("✅ {}", alert.text().green().bold()),
        AlertKind::Error => println!("❌ {}", alert.text().red()),
        AlertKind::Info => println!("ℹ️  {}", alert.text().cyan()),
    }
}

fn status_label(status: MatchStatus) -> String {
    match status {
        MatchStatus::NotStarted => status.name().bright_black().to_string(),
        MatchStatus::InProgress => status.name().cyan().to_string(),
        MatchStatus::Won => status.name().green().bold().to_string(),
        MatchStatus::Lost => status.name().red().bold().to_string(),
    }
}

/// Spinner shown while the ledger is being called
#[must_use]
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
