//! Core logger types and traits

pub mod buffer_pool;
pub mod call_site;
pub mod config;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod renderer;

pub use buffer_pool::BufferPool;
pub use call_site::CallSite;
pub use config::{LoggerConfig, OutputTarget};
pub use error::{LoggerError, Result};
pub use handler::Handler;
pub use log_level::{LevelMask, LogLevel};
pub use logger::{Logger, LoggerBuilder, DEFAULT_QUEUE_CAPACITY};
pub use metrics::{LoggerMetrics, MetricsSnapshot};
pub use overflow_policy::OverflowPolicy;
pub use renderer::{RenderOptions, TIME_FORMAT};
