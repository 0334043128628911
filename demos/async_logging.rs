//! Async logging example
//!
//! Demonstrates many producer threads sharing one logger, backpressure on a
//! small queue, and the counters exposed through `LoggerMetrics`.
//!
//! Run with: cargo run --example async_logging

use rust_async_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Stdout handler that pretends to be a slow disk
struct SlowStdout {
    inner: StreamHandler<std::io::Stdout>,
}

impl Handler for SlowStdout {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        thread::sleep(Duration::from_millis(1));
        self.inner.write(record)
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }

    fn name(&self) -> &str {
        "slow_stdout"
    }
}

fn run(policy: OverflowPolicy) -> Result<()> {
    let logger = Arc::new(
        Logger::builder()
            .handler(SlowStdout {
                inner: StreamHandler::stdout(),
            })
            .queue_capacity(16)
            .overflow_policy(policy)
            .build()?,
    );

    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..20 {
                    logger.info(format_args!("Thread {} - Message {}", thread_id, i));
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("producer thread panicked");
        }
    }

    // Close drains everything that was accepted
    logger.close()?;

    let metrics = logger.metrics();
    println!(
        "   policy={} written={} dropped={} queue_full_events={}",
        policy,
        metrics.total_written(),
        metrics.dropped_count(),
        metrics.queue_full_events()
    );
    Ok(())
}

fn main() -> Result<()> {
    println!("=== Rust Async Logger - Async Logging Example ===\n");

    println!("1. Producers block while the queue is full:");
    run(OverflowPolicy::Block)?;

    println!("\n2. Producers drop records while the queue is full:");
    run(OverflowPolicy::DropNewest)?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
