//! # Rust Async Logger
//!
//! An asynchronous, colorized logger. Callers filter, render and enqueue;
//! one dispatch thread per logger performs all output.
//!
//! ## Features
//!
//! - **Non-blocking I/O for callers**: records are rendered to bytes at the
//!   call site and written by a dedicated thread
//! - **Bitmask levels**: enable any subset of DEBUG, INFO, WARN and ERROR
//! - **Buffer reuse**: rendered records travel in pooled buffers
//! - **Backpressure**: a full queue blocks producers, or drops and counts
//! - **Graceful close**: everything enqueued before `close` is written
//!
//! ```
//! use rust_async_logger::prelude::*;
//!
//! let memory = MemoryHandler::new();
//! let logger = Logger::builder()
//!     .handler(memory.clone())
//!     .level(LogLevel::Warn | LogLevel::Error)
//!     .build()?;
//!
//! logger.info("filtered out");
//! logger.error("written");
//! logger.close()?;
//!
//! assert_eq!(memory.len(), 1);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod global;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        CallSite, Handler, LevelMask, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, MetricsSnapshot, OutputTarget, OverflowPolicy, Result,
    };
    pub use crate::handlers::{MemoryHandler, StreamHandler};
    #[cfg(feature = "file")]
    pub use crate::handlers::{RotationWhen, TimeRotatingFileHandler};
}

pub use crate::core::{
    BufferPool, CallSite, Handler, LevelMask, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, MetricsSnapshot, OutputTarget, OverflowPolicy, RenderOptions, Result,
    DEFAULT_QUEUE_CAPACITY,
};
pub use handlers::{MemoryHandler, StreamHandler};
#[cfg(feature = "file")]
pub use handlers::{RotationWhen, TimeRotatingFileHandler};
