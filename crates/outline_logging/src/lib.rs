#![deny(missing_docs)]
//! Shared logging utilities for the outline companion workspace.
//!
//! This crate provides the `outline_*` logging macros used across the
//! codebase, a per-thread reconciliation pass counter, and a minimal test
//! initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Number of the reconciliation pass currently running on this thread.
    static PASS: Cell<u64> = const { Cell::new(0) };
}

/// Records the number of the reconciliation pass that is about to run.
/// The session driver calls this once per collect/dedupe/render cycle.
pub fn set_pass(pass: u64) {
    PASS.with(|v| v.set(pass));
}

/// Returns the number of the most recent reconciliation pass on this thread.
/// Returns 0 before the first pass.
pub fn current_pass() -> u64 {
    PASS.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! outline_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! outline_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! outline_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! outline_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! outline_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
