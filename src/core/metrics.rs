//! Delivery counters
//!
//! Updated by producers (drops, queue-full events) and by the dispatch
//! thread (writes, handler failures). All counters are monotonic until
//! [`LoggerMetrics::reset`].

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared between a logger's producers and its dispatch thread
///
/// # Example
///
/// ```
/// use rust_async_logger::prelude::*;
///
/// let logger = Logger::new(MemoryHandler::new()).unwrap();
/// logger.warn("low disk space");
/// logger.close().unwrap();
/// logger.warn("too late");
///
/// let snapshot = logger.metrics().snapshot();
/// assert_eq!(snapshot.total_written, 1);
/// assert_eq!(snapshot.dropped, 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    written: AtomicU64,
    dropped: AtomicU64,
    write_errors: AtomicU64,
    queue_full: AtomicU64,
}

/// Point-in-time copy of [`LoggerMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub total_written: u64,
    pub dropped: u64,
    pub write_errors: u64,
    pub queue_full_events: u64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            queue_full: AtomicU64::new(0),
        }
    }

    /// Records the handler accepted
    pub fn total_written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Records accepted by the filter but never handed to the handler
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Handler writes that returned an error or panicked
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    /// Times a producer found the queue full
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full.load(Ordering::Relaxed)
    }

    // The recorders return the count before the increment.

    #[inline]
    pub(crate) fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_queue_full(&self) -> u64 {
        self.queue_full.fetch_add(1, Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_written: self.total_written(),
            dropped: self.dropped_count(),
            write_errors: self.write_errors(),
            queue_full_events: self.queue_full_events(),
        }
    }

    pub fn reset(&self) {
        for counter in [&self.written, &self.dropped, &self.write_errors, &self.queue_full] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
