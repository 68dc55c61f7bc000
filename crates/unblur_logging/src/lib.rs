#![deny(missing_docs)]
//! Shared logging utilities for the unblur workspace.
//!
//! This crate provides the `unblur_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line is tagged
//! with the session generation the current thread is working on, so that a
//! settlement arriving for a superseded attempt can be told apart in the log.

use std::cell::Cell;

#[doc(hidden)]
pub use log as __log;

thread_local! {
    /// Thread-local storage for the session generation being processed.
    static SESSION_GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the session generation for the current thread.
/// The message loop calls this after every dispatched message.
pub fn set_session_generation(generation: u64) {
    SESSION_GENERATION.with(|v| v.set(generation));
}

/// Retrieves the session generation for the current thread.
/// Returns 0 if no generation has been set.
pub fn session_generation() -> u64 {
    SESSION_GENERATION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the session generation.
#[macro_export]
macro_rules! unblur_trace {
    ($($arg:tt)*) => {{
        $crate::__log::trace!("[gen {}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the session generation.
#[macro_export]
macro_rules! unblur_info {
    ($($arg:tt)*) => {{
        $crate::__log::info!("[gen {}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the session generation.
#[macro_export]
macro_rules! unblur_debug {
    ($($arg:tt)*) => {{
        $crate::__log::debug!("[gen {}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the session generation.
#[macro_export]
macro_rules! unblur_warn {
    ($($arg:tt)*) => {{
        $crate::__log::warn!("[gen {}] {}", $crate::session_generation(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the session generation.
#[macro_export]
macro_rules! unblur_error {
    ($($arg:tt)*) => {{
        $crate::__log::error!("[gen {}] {}", $crate::session_generation(), format_args!($($arg)*));
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
