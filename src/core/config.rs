//! Serializable logger configuration
//!
//! # Example
//!
//! ```
//! use rust_async_logger::core::{LoggerConfig, OutputTarget};
//! use rust_async_logger::{LevelMask, LogLevel, OverflowPolicy};
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "warn|error",
//!     "queue_capacity": 4096,
//!     "overflow_policy": "drop_newest",
//!     "output": { "type": "stderr" }
//! }"#).unwrap();
//!
//! assert_eq!(config.level, LogLevel::Warn | LogLevel::Error);
//! assert_eq!(config.overflow_policy, OverflowPolicy::DropNewest);
//! assert_eq!(config.output, OutputTarget::Stderr);
//! ```

use super::{
    buffer_pool::{DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_SIZE},
    error::{LoggerError, Result},
    handler::Handler,
    log_level::LevelMask,
    logger::{Logger, DEFAULT_QUEUE_CAPACITY},
    overflow_policy::OverflowPolicy,
};
use crate::handlers::StreamHandler;
#[cfg(feature = "file")]
use crate::handlers::{RotationWhen, TimeRotatingFileHandler};
use serde::{Deserialize, Serialize};
#[cfg(feature = "file")]
use std::path::PathBuf;

/// Where rendered records go
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputTarget {
    #[default]
    Stdout,
    Stderr,
    /// Time-rotated log file
    #[cfg(feature = "file")]
    File {
        path: PathBuf,
        #[serde(default = "default_rotation_when")]
        when: RotationWhen,
        #[serde(default = "default_rotation_interval")]
        interval: u32,
        #[serde(default)]
        compress: bool,
    },
}

#[cfg(feature = "file")]
fn default_rotation_when() -> RotationWhen {
    RotationWhen::Day
}

#[cfg(feature = "file")]
fn default_rotation_interval() -> u32 {
    1
}

impl OutputTarget {
    /// Daily-rotated file at `path`
    #[cfg(feature = "file")]
    pub fn daily_file(path: impl Into<PathBuf>) -> Self {
        OutputTarget::File {
            path: path.into(),
            when: default_rotation_when(),
            interval: default_rotation_interval(),
            compress: false,
        }
    }

    /// Open the handler for this target
    ///
    /// # Errors
    ///
    /// Returns error if a file target cannot be opened
    pub fn open(&self) -> Result<Box<dyn Handler>> {
        match self {
            OutputTarget::Stdout => Ok(Box::new(StreamHandler::stdout())),
            OutputTarget::Stderr => Ok(Box::new(StreamHandler::stderr())),
            #[cfg(feature = "file")]
            OutputTarget::File {
                path,
                when,
                interval,
                compress,
            } => {
                let handler = TimeRotatingFileHandler::new(path, *when, *interval)?
                    .with_compression(*compress);
                Ok(Box::new(handler))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Enabled levels
    pub level: LevelMask,
    pub queue_capacity: usize,
    pub pool_size: usize,
    pub buffer_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    /// Colorize level labels
    pub colors: bool,
    pub output: OutputTarget,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelMask::ALL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            colors: true,
            output: OutputTarget::default(),
        }
    }
}

impl LoggerConfig {
    /// Parse a JSON document; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns error on malformed JSON or invalid values
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "queue_capacity must be greater than zero",
            ));
        }
        #[cfg(feature = "file")]
        if let OutputTarget::File { path, interval, .. } = &self.output {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("LoggerConfig", "output file path is empty"));
            }
            if *interval == 0 {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    "rotation interval must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    /// Open the output and start a logger
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the output cannot be opened
    pub fn build(&self) -> Result<Logger> {
        self.validate()?;
        Logger::builder()
            .boxed_handler(self.output.open()?)
            .level(self.level)
            .queue_capacity(self.queue_capacity)
            .pool_size(self.pool_size)
            .buffer_capacity(self.buffer_capacity)
            .overflow_policy(self.overflow_policy)
            .colors(self.colors)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = LoggerConfig::from_json("{}").unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level, LevelMask::ALL);
        assert_eq!(config.queue_capacity, 1024);
        assert_eq!(config.pool_size, 16);
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let err = LoggerConfig::from_json(r#"{"queue_capacity": 0}"#).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }

    #[test]
    fn test_bad_level_rejected() {
        let err = LoggerConfig::from_json(r#"{"level": "loud"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::Json(_)));
    }

    #[test]
    fn test_build_stderr_logger() {
        let config = LoggerConfig {
            level: LogLevel::Error.into(),
            output: OutputTarget::Stderr,
            ..LoggerConfig::default()
        };
        let logger = config.build().unwrap();
        assert_eq!(logger.handler_name(), "stderr");
        assert_eq!(logger.level(), LevelMask::from(LogLevel::Error));
        logger.close().unwrap();
    }

    #[cfg(feature = "file")]
    #[test]
    fn test_file_target_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("svc.log");
        let json = format!(
            r#"{{"colors": false, "output": {{"type": "file", "path": {:?}, "when": "hour"}}}}"#,
            path.to_str().unwrap()
        );
        let config = LoggerConfig::from_json(&json).unwrap();
        assert_eq!(
            config.output,
            OutputTarget::File {
                path: path.clone(),
                when: RotationWhen::Hour,
                interval: 1,
                compress: false,
            }
        );

        let logger = config.build().unwrap();
        logger.info("written to file");
        logger.close().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(" - INFO - config.rs:["));
        assert!(content.ends_with("written to file\n"));
    }
}
