//! Command implementations

pub mod check;
pub mod simple;
pub mod status;

pub use check::{CheckResult, check_guess};
pub use simple::{LineCommand, run_simple};
pub use status::run_status;
