#![deny(missing_docs)]
//! Shared logging utilities for the gleaner workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every line logged
//! through the macros carries the ordinal of the fetch currently being
//! processed on this thread, so the output of one URL can be grepped out of
//! a long batch run.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the ordinal of the fetch in progress.
    static CURRENT_FETCH: Cell<u64> = const { Cell::new(0) };
}

/// Sets the fetch ordinal for the current thread.
/// The batch runner calls this once before processing each URL.
pub fn set_current_fetch(ordinal: u64) {
    CURRENT_FETCH.with(|v| v.set(ordinal));
}

/// Retrieves the fetch ordinal for the current thread.
/// Returns 0 outside of a batch run.
pub fn current_fetch() -> u64 {
    CURRENT_FETCH.with(|v| v.get())
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[fetch {}] {}", $crate::current_fetch(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[fetch {}] {}", $crate::current_fetch(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[fetch {}] {}", $crate::current_fetch(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[fetch {}] {}", $crate::current_fetch(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[fetch {}] {}", $crate::current_fetch(), format_args!($($arg)*));
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

#[cfg(test)]
mod tests {
    use super::{current_fetch, set_current_fetch};

    #[test]
    fn fetch_ordinal_is_per_thread() {
        set_current_fetch(7);
        assert_eq!(current_fetch(), 7);

        let other = std::thread::spawn(current_fetch).join().unwrap();
        assert_eq!(other, 0);
    }

    #[test]
    fn macros_accept_format_arguments() {
        super::initialize_for_tests();
        set_current_fetch(3);
        engine_info!("fetched {} bytes from {}", 12, "https://example.com");
        engine_debug!("plain message");
    }
}
