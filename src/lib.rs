//! Sealed Wordle
//!
//! A word-guessing client for matches whose state lives on a remote ledger
//! behind an encrypted-computation provider. The client never holds
//! authoritative state: it validates input locally, submits guesses, and
//! rebuilds its view from what the ledger reports.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sealed_wordle::core::{Word, classify};
//!
//! let guess = Word::new("erase").unwrap();
//! let solution = Word::new("speed").unwrap();
//!
//! let feedback = classify(&guess, &solution).unwrap();
//! println!("{}", feedback.to_emoji());
//! ```

// Core domain types
pub mod core;

// Game configuration and epochs
pub mod config;

// Word lists
pub mod wordlists;

// Remote ledger access
pub mod gateway;

// Reconciliation with the ledger
pub mod controller;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;
