//! Basic logger usage example
//!
//! Demonstrates logging to stdout with colored labels and level masks.
//!
//! Run with: cargo run --example basic_usage

use rust_async_logger::prelude::*;
use rust_async_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Async Logger - Basic Usage Example ===\n");

    // Stdout handler, all levels enabled
    let logger = Logger::builder().build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    // Records are written by the dispatch thread; close waits for them
    logger.close()?;

    println!("\n2. Masking levels (only WARN and ERROR):");
    let logger = Logger::builder()
        .level(LogLevel::Warn | LogLevel::Error)
        .build()?;
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    warn!(logger, "Disk usage at {}%", 91);
    info!(logger, "Still hidden: {}", "info");
    logger.close()?;

    println!("\n3. Progress output on a single terminal line:");
    let logger = Logger::builder().colors(false).build()?;
    logger.info("starting download");
    for pct in (0..=100).step_by(25) {
        logger.debug_line(format_args!("downloaded {}%", pct));
    }
    logger.close()?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
