//! Logging macros for ergonomic log message formatting.
//!
//! Every macro has two forms: with a logger expression first, the record goes
//! to that logger; starting with the format string, it goes to the
//! process-wide default logger in [`crate::global`]. The call site is taken
//! from `file!()`/`line!()` at the macro invocation, and arguments are
//! formatted straight into the record buffer.
//!
//! # Examples
//!
//! ```
//! use rust_async_logger::prelude::*;
//! use rust_async_logger::info;
//!
//! let logger = Logger::new(MemoryHandler::new()).unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! logger.close().unwrap();
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new(MemoryHandler::new()).unwrap();
/// use rust_async_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:literal $($arg:tt)*) => {
        $crate::global::log_at(
            $level,
            $crate::CallSite::new(file!(), line!()),
            format_args!($fmt $($arg)*),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            $crate::CallSite::new(file!(), line!()),
            format_args!($($arg)+),
        )
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new(MemoryHandler::new()).unwrap();
/// use rust_async_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Debug, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Info, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new(MemoryHandler::new()).unwrap();
/// use rust_async_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Warn, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::log!($crate::LogLevel::Error, $fmt $($arg)*)
    };
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Debug message that redraws the previous terminal line, for progress output.
#[macro_export]
macro_rules! debug_line {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::debug_line_at(
            $crate::CallSite::new(file!(), line!()),
            format_args!($fmt $($arg)*),
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug_line_at(
            $crate::CallSite::new(file!(), line!()),
            format_args!($($arg)+),
        )
    };
}
