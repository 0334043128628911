//! File logging example
//!
//! Demonstrates a daily-rotated log file, configured either directly or from
//! JSON, and routing the process-wide default logger to a file.
//!
//! Run with: cargo run --example file_logging

use rust_async_logger::prelude::*;
use rust_async_logger::{global, info};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== Rust Async Logger - File Logging Example ===\n");

    println!("1. Logging to a rotating file handler:");
    let handler = TimeRotatingFileHandler::new("application.log", RotationWhen::Day, 1)?
        .with_compression(true);
    let logger = Logger::builder().handler(handler).colors(false).build()?;

    logger.info("Application started");
    logger.debug("Loading configuration...");
    logger.warn("Using default settings for some options");
    for i in 1..=5 {
        info!(logger, "Processing item {}/5", i);
    }
    logger.error("Failed to load optional plugin");
    logger.close()?;

    println!("\n2. Building a logger from JSON configuration:");
    let config = LoggerConfig::from_json(
        r#"{
            "level": "warn|error",
            "colors": false,
            "output": { "type": "file", "path": "configured.log", "when": "hour" }
        }"#,
    )?;
    let logger = config.build()?;
    logger.info("Not written, INFO is masked out");
    logger.warn("Written to configured.log");
    logger.close()?;

    println!("\n3. Routing the default logger to a file:");
    global::set_log_file(Some(Path::new("global.log")))?;
    global::info("Default logger now writes to global.log");
    rust_async_logger::warn!("Queue depth {}", 12);
    // Back to stdout; the file logger is drained and closed
    global::set_log_file(None)?;
    global::close()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log', 'configured.log' and 'global.log'");

    Ok(())
}
