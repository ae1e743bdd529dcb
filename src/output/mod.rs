//! Terminal output formatting
//!
//! Alerts plus the coloured board used by the line-based commands.

pub mod alerts;
pub mod display;
pub mod formatters;

pub use alerts::{Alert, AlertKind, WIN_MESSAGES, win_message};
pub use display::{print_alert, print_board, print_check_result, print_status_report, spinner};
