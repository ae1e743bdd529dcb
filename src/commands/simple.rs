//! Simple interactive CLI mode
//!
//! Line-based game without TUI: one guess per line, remote calls awaited
//! behind a spinner.

use crate::controller::{ControllerError, ReconciliationController, SubmitOutcome, Transition};
use crate::core::{MatchStatus, Rejection, grapheme_len};
use crate::gateway::RemoteStateGateway;
use crate::output::{Alert, print_alert, print_board, spinner};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Quit,
    Start,
    Refresh,
    Board,
    Guess(String),
}

impl LineCommand {
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" => None,
            "/quit" | "/q" | "/exit" => Some(Self::Quit),
            "/start" => Some(Self::Start),
            "/refresh" | "/r" => Some(Self::Refresh),
            "/board" | "/b" => Some(Self::Board),
            guess => Some(Self::Guess(guess.to_string())),
        }
    }
}

/// Run the simple interactive CLI mode
///
/// # Errors
///
/// Returns an error if there's an I/O error reading user input or if the
/// encrypted-computation provider never becomes ready.
pub async fn run_simple<G: RemoteStateGateway + Clone>(
    controller: &mut ReconciliationController<G>,
    epoch: u64,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Sealed Wordle #{epoch:<6}                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Guess the {}-letter word.", controller.progress().solution_length());
    println!("Commands: /start, /refresh, /board, /quit\n");

    let pb = spinner("Waiting for encrypted computation...");
    let initial = controller.initialize().await;
    pb.finish_and_clear();
    let transition = initial.context("failed to connect to the ledger")?;
    announce(controller, transition);

    if controller.status() == MatchStatus::NotStarted {
        println!("The match has not started. Type /start to begin.\n");
    }
    print_board(controller.progress(), None);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let Some(command) = LineCommand::parse(&line.context("failed to read input")?) else {
            continue;
        };

        match command {
            LineCommand::Quit => break,
            LineCommand::Board => print_board(controller.progress(), Some(controller.input())),
            LineCommand::Refresh => {
                let pb = spinner("Refreshing...");
                let result = controller.reconcile().await;
                pb.finish_and_clear();
                match result {
                    Ok(transition) => announce(controller, transition),
                    Err(error) => print_alert(&Alert::from(&error)),
                }
                print_board(controller.progress(), None);
            }
            LineCommand::Start => {
                let pb = spinner("Starting match...");
                let result = controller.start_match().await;
                pb.finish_and_clear();
                report_outcome(controller, result);
            }
            LineCommand::Guess(guess) => {
                if let Err(error) = type_guess(controller, &guess) {
                    print_alert(&Alert::from(&error));
                    continue;
                }
                let pb = spinner("Submitting guess...");
                let result = controller.submit().await;
                pb.finish_and_clear();
                report_outcome(controller, result);
            }
        }

        if controller.status().is_terminal() {
            println!("\n👋 Thanks for playing!\n");
            break;
        }
    }

    Ok(())
}

/// Replace the input row with `guess`, one keystroke at a time
fn type_guess<G: RemoteStateGateway + Clone>(
    controller: &mut ReconciliationController<G>,
    guess: &str,
) -> Result<(), ControllerError> {
    controller.clear_input();
    for c in guess.chars() {
        controller.append_char(c);
    }
    if grapheme_len(guess) != controller.input().len() {
        return Err(Rejection::NotEnoughLetters.into());
    }
    Ok(())
}

fn report_outcome<G>(
    controller: &ReconciliationController<G>,
    result: Result<SubmitOutcome, ControllerError>,
) {
    match result {
        Ok(SubmitOutcome::Accepted(transition)) => {
            announce(controller, transition);
            print_board(controller.progress(), None);
        }
        Ok(SubmitOutcome::Ignored) => {
            print_alert(&Alert::info(format!(
                "Nothing sent: the match is {}",
                controller.status().name()
            )));
        }
        Err(error) => print_alert(&Alert::from(&error)),
    }
}

fn announce<G>(controller: &ReconciliationController<G>, transition: Transition) {
    if let Some(alert) = Alert::for_transition(transition, controller.progress()) {
        print_alert(&alert);
    }
}
