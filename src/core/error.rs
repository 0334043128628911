//! Error types for the logger
//!
//! Emission never returns errors; these surface from construction,
//! configuration, handler operations and `close`.

use std::io;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// I/O failure with what was being done and to which target
    #[error("I/O error while {context} ({target}): {source}")]
    IoContext {
        context: String,
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration document could not be parsed
    #[error("malformed logger configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {component} configuration: {message}")]
    Config { component: String, message: String },

    /// Unparseable level or level mask
    #[error("unknown log level '{0}'")]
    InvalidLevel(String),

    /// Log file could not be opened, or was used after close
    #[error("log file '{path}' unavailable: {message}")]
    FileUnavailable { path: String, message: String },

    #[error("rotating '{path}' failed: {message}")]
    Rotation { path: String, message: String },

    /// The dispatch thread could not be started
    #[error("cannot start dispatch thread: {0}")]
    WorkerSpawn(#[source] io::Error),

    /// The dispatch thread panicked and took the handler with it
    #[error("dispatch thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn io(context: impl Into<String>, target: impl Into<String>, source: io::Error) -> Self {
        LoggerError::IoContext {
            context: context.into(),
            target: target.into(),
            source,
        }
    }

    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Config {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn file_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_level(input: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(input.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        LoggerError::Other(message.into())
    }
}
