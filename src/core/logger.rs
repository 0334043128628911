//! Main logger implementation
//!
//! Producers filter, render and enqueue on the calling thread. A single
//! dispatch thread owns the handler and performs every write, so the handler
//! never sees concurrent calls and callers never perform I/O.

use super::{
    buffer_pool::{BufferPool, DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_SIZE},
    call_site::CallSite,
    error::{LoggerError, Result},
    handler::Handler,
    log_level::{LevelMask, LogLevel},
    metrics::LoggerMetrics,
    overflow_policy::OverflowPolicy,
    renderer::{self, RenderOptions},
};
use crate::handlers::StreamHandler;
use chrono::Local;
use crossbeam_channel::{bounded, select, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Default number of rendered records that may wait for the dispatch thread
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Handler write failures are reported on the first and every Nth occurrence
const WRITE_ERROR_REPORT_INTERVAL: u64 = 1000;

const DISPATCH_THREAD_NAME: &str = "logger-dispatch";

pub struct Logger {
    level: AtomicU8,
    sender: Sender<Vec<u8>>,
    /// Dropping this sender is the shutdown signal
    shutdown: Mutex<Option<Sender<()>>>,
    /// Yields the handler back once the dispatch loop has drained
    worker: Mutex<Option<JoinHandle<Box<dyn Handler>>>>,
    closed: AtomicBool,
    pool: Arc<BufferPool>,
    metrics: Arc<LoggerMetrics>,
    overflow_policy: OverflowPolicy,
    colors: bool,
    handler_name: String,
}

impl Logger {
    /// Create a logger writing to `handler` with default settings
    ///
    /// # Errors
    ///
    /// Returns error if the dispatch thread cannot be spawned
    pub fn new<H: Handler + 'static>(handler: H) -> Result<Self> {
        Self::builder().handler(handler).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_async_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Warn | LogLevel::Error)
    ///     .queue_capacity(256)
    ///     .handler(MemoryHandler::new())
    ///     .build()
    ///     .unwrap();
    /// logger.close().unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn spawn(handler: Box<dyn Handler>, config: LoggerBuilder) -> Result<Self> {
        let (sender, records) = bounded(config.queue_capacity);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let pool = Arc::new(BufferPool::with_limits(config.pool_size, config.buffer_capacity));
        let metrics = Arc::new(LoggerMetrics::new());
        let handler_name = handler.name().to_string();

        let worker = {
            let pool = Arc::clone(&pool);
            let metrics = Arc::clone(&metrics);
            thread::Builder::new()
                .name(DISPATCH_THREAD_NAME.to_string())
                .spawn(move || Self::dispatch(handler, records, shutdown_rx, &pool, &metrics))
                .map_err(LoggerError::WorkerSpawn)?
        };

        Ok(Self {
            level: AtomicU8::new(config.level.bits()),
            sender,
            shutdown: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(worker)),
            closed: AtomicBool::new(false),
            pool,
            metrics,
            overflow_policy: config.overflow_policy,
            colors: config.colors,
            handler_name,
        })
    }

    /// Dispatch loop: the only consumer of the queue and the only writer.
    ///
    /// On shutdown, records already queued are written before the loop exits.
    fn dispatch(
        mut handler: Box<dyn Handler>,
        records: Receiver<Vec<u8>>,
        shutdown: Receiver<()>,
        pool: &BufferPool,
        metrics: &LoggerMetrics,
    ) -> Box<dyn Handler> {
        loop {
            let running = select! {
                recv(records) -> record => match record {
                    Ok(buf) => {
                        Self::write_record(&mut handler, buf, pool, metrics);
                        true
                    }
                    Err(_) => false,
                },
                recv(shutdown) -> _ => {
                    while let Ok(buf) = records.try_recv() {
                        Self::write_record(&mut handler, buf, pool, metrics);
                    }
                    false
                }
            };
            if !running {
                return handler;
            }
        }
    }

    /// Write one buffer, isolating handler errors and panics from the loop
    fn write_record(
        handler: &mut Box<dyn Handler>,
        buf: Vec<u8>,
        pool: &BufferPool,
        metrics: &LoggerMetrics,
    ) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler.write(&buf)));

        match result {
            Ok(Ok(())) => {
                metrics.record_written();
            }
            Ok(Err(e)) => Self::report_write_error(metrics, handler.name(), &e.to_string()),
            Err(payload) => Self::report_write_error(
                metrics,
                handler.name(),
                &format!("handler panicked: {}", panic_message(payload.as_ref())),
            ),
        }

        pool.release(buf);
    }

    fn report_write_error(metrics: &LoggerMetrics, handler_name: &str, reason: &str) {
        let previous = metrics.record_write_error();
        if previous % WRITE_ERROR_REPORT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] Handler '{}' failed to write a record ({} failures so far): {}",
                handler_name,
                previous + 1,
                reason
            );
        }
    }

    /// Replace the enabled level mask
    pub fn set_level(&self, level: impl Into<LevelMask>) {
        self.level.store(level.into().bits(), Ordering::Relaxed);
    }

    pub fn level(&self) -> LevelMask {
        LevelMask::from_bits(self.level.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.level().contains(level)
    }

    /// Log `message` at `level`, attributed to `call_site`.
    ///
    /// Blocks only when the queue is full and the overflow policy is
    /// [`OverflowPolicy::Block`].
    pub fn log_at(&self, level: LogLevel, call_site: CallSite, message: impl fmt::Display) {
        self.emit(level, call_site, &message, false);
    }

    /// Debug record that redraws the previous terminal line
    pub fn debug_line_at(&self, call_site: CallSite, message: impl fmt::Display) {
        self.emit(LogLevel::Debug, call_site, &message, true);
    }

    fn emit(
        &self,
        level: LogLevel,
        call_site: CallSite,
        message: &dyn fmt::Display,
        overwrite_line: bool,
    ) {
        if !self.is_enabled(level) {
            return;
        }
        if self.closed.load(Ordering::Acquire) {
            self.metrics.record_dropped();
            return;
        }

        let options = RenderOptions::default()
            .with_colors(self.colors)
            .with_overwrite_line(overwrite_line);

        let mut buf = self.pool.acquire();
        renderer::render(&mut buf, &Local::now(), level, call_site, message, options);
        self.enqueue(buf);
    }

    fn enqueue(&self, buf: Vec<u8>) {
        match self.sender.try_send(buf) {
            Ok(()) => {}
            Err(TrySendError::Full(buf)) => {
                self.metrics.record_queue_full();
                match self.overflow_policy {
                    OverflowPolicy::Block => {
                        if let Err(e) = self.sender.send(buf) {
                            // Dispatch thread exited while we waited
                            self.discard(e.into_inner());
                        }
                    }
                    OverflowPolicy::DropNewest => self.discard(buf),
                }
            }
            Err(TrySendError::Disconnected(buf)) => self.discard(buf),
        }
    }

    fn discard(&self, buf: Vec<u8>) {
        self.metrics.record_dropped();
        self.pool.release(buf);
    }

    #[track_caller]
    #[inline]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        self.log_at(level, CallSite::caller(), message);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log_at(LogLevel::Debug, CallSite::caller(), message);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl fmt::Display) {
        self.log_at(LogLevel::Info, CallSite::caller(), message);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log_at(LogLevel::Warn, CallSite::caller(), message);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl fmt::Display) {
        self.log_at(LogLevel::Error, CallSite::caller(), message);
    }

    #[track_caller]
    #[inline]
    pub fn debug_line(&self, message: impl fmt::Display) {
        self.debug_line_at(CallSite::caller(), message);
    }

    /// Stop accepting records, drain the queue and close the handler.
    ///
    /// Blocks until every record enqueued before the call has been written.
    /// A concurrent caller waits for the drain in progress; once closed,
    /// further calls are a no-op.
    ///
    /// # Errors
    ///
    /// Returns the handler's close error, or [`LoggerError::WorkerPanicked`]
    /// if the dispatch thread died and the handler was lost.
    pub fn close(&self) -> Result<()> {
        // Held until the handler is closed so no caller returns mid-drain
        let mut worker = self.worker.lock();
        self.closed.store(true, Ordering::Release);

        let Some(handle) = worker.take() else {
            return Ok(());
        };
        drop(self.shutdown.lock().take());

        let mut handler = handle
            .join()
            .map_err(|payload| LoggerError::WorkerPanicked(panic_message(payload.as_ref())))?;

        handler.close()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Records rendered but not yet picked up by the dispatch thread
    pub fn queued(&self) -> usize {
        self.sender.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.sender.capacity().unwrap_or(0)
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use rust_async_logger::prelude::*;
    ///
    /// let logger = Logger::new(MemoryHandler::new()).unwrap();
    /// logger.info("hello");
    /// logger.close().unwrap();
    ///
    /// assert_eq!(logger.metrics().total_written(), 1);
    /// assert_eq!(logger.metrics().write_errors(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[cfg(test)]
    pub(crate) fn buffer_pool(&self) -> &BufferPool {
        &self.pool
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("handler", &self.handler_name)
            .field("queued", &self.queued())
            .field("overflow_policy", &self.overflow_policy)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to close logger: {}", e);
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shut down with {} dropped records",
                dropped
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_async_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LevelMask::ALL)
///     .handler(StreamHandler::stderr())
///     .queue_capacity(1000)
///     .overflow_policy(OverflowPolicy::DropNewest)
///     .colors(false)
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    handler: Option<Box<dyn Handler>>,
    level: LevelMask,
    queue_capacity: usize,
    pool_size: usize,
    buffer_capacity: usize,
    overflow_policy: OverflowPolicy,
    colors: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            handler: None,
            level: LevelMask::ALL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            overflow_policy: OverflowPolicy::Block,
            colors: true,
        }
    }

    /// Set the output handler; stdout is used when none is given
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_handler(mut self, handler: Box<dyn Handler>) -> Self {
        self.handler = Some(handler);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<LevelMask>) -> Self {
        self.level = level.into();
        self
    }

    /// Maximum number of records waiting for the dispatch thread
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Maximum number of idle buffers kept for reuse
    #[must_use = "builder methods return a new value"]
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Colorize level labels
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Build the Logger and start its dispatch thread
    ///
    /// # Errors
    ///
    /// Returns error if the queue capacity is zero or the thread cannot start
    pub fn build(mut self) -> Result<Logger> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerBuilder",
                "queue capacity must be greater than zero",
            ));
        }

        let handler = self
            .handler
            .take()
            .unwrap_or_else(|| Box::new(StreamHandler::stdout()));
        Logger::spawn(handler, self)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::MemoryHandler;
    use std::time::Duration;

    struct FailingHandler;

    impl Handler for FailingHandler {
        fn write(&mut self, _record: &[u8]) -> Result<()> {
            Err(LoggerError::other("disk unplugged"))
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingHandler;

    impl Handler for PanickingHandler {
        fn write(&mut self, record: &[u8]) -> Result<()> {
            if record.windows(5).any(|w| w == b"crash") {
                panic!("handler exploded");
            }
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    /// Blocks every write until the gate channel yields
    struct GatedHandler {
        gate: Receiver<()>,
        inner: MemoryHandler,
    }

    impl Handler for GatedHandler {
        fn write(&mut self, record: &[u8]) -> Result<()> {
            let _ = self.gate.recv();
            self.inner.write(record)
        }

        fn close(&mut self) -> Result<()> {
            self.inner.close()
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    #[track_caller]
    fn log_through_wrapper(logger: &Logger, message: &str) {
        logger.warn(message);
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().handler(MemoryHandler::new()).build().unwrap();
        assert_eq!(logger.level(), LevelMask::ALL);
        assert_eq!(logger.queue_capacity(), DEFAULT_QUEUE_CAPACITY);
        assert_eq!(logger.overflow_policy(), OverflowPolicy::Block);
        assert_eq!(logger.handler_name(), "memory");
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let err = Logger::builder()
            .handler(MemoryHandler::new())
            .queue_capacity(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }

    #[test]
    fn test_level_filtering() {
        let memory = MemoryHandler::new();
        let logger = Logger::builder()
            .handler(memory.clone())
            .level(LogLevel::Warn | LogLevel::Error)
            .colors(false)
            .build()
            .unwrap();

        logger.info("hidden info");
        logger.debug("hidden debug");
        logger.error("visible error");
        logger.close().unwrap();

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" - ERROR - "));
        assert!(lines[0].ends_with("visible error\n"));
    }

    #[test]
    fn test_set_level_at_runtime() {
        let memory = MemoryHandler::new();
        let logger = Logger::new(memory.clone()).unwrap();

        logger.set_level(LogLevel::Error);
        assert_eq!(logger.level(), LevelMask::from(LogLevel::Error));
        logger.warn("filtered");

        logger.set_level(LevelMask::ALL);
        logger.warn("passed");
        logger.close().unwrap();

        assert_eq!(memory.len(), 1);
        assert!(memory.lines()[0].contains("passed"));
    }

    #[test]
    fn test_close_drains_and_closes_handler() {
        let memory = MemoryHandler::new();
        let logger = Logger::new(memory.clone()).unwrap();

        for i in 0..100 {
            logger.info(format_args!("record {}", i));
        }
        logger.close().unwrap();

        assert_eq!(memory.len(), 100);
        assert!(memory.is_closed());
        assert!(logger.is_closed());
        assert_eq!(logger.metrics().total_written(), 100);
    }

    #[test]
    fn test_close_is_idempotent() {
        let memory = MemoryHandler::new();
        let logger = Logger::new(memory.clone()).unwrap();
        logger.info("once");
        logger.close().unwrap();
        logger.close().unwrap();
        assert_eq!(memory.close_count(), 1);
    }

    #[test]
    fn test_records_after_close_are_dropped() {
        let memory = MemoryHandler::new();
        let logger = Logger::new(memory.clone()).unwrap();
        logger.close().unwrap();

        logger.error("too late");

        assert_eq!(memory.len(), 0);
        assert_eq!(logger.metrics().dropped_count(), 1);
    }

    #[test]
    fn test_write_errors_are_counted_not_raised() {
        let logger = Logger::new(FailingHandler).unwrap();
        for _ in 0..3 {
            logger.error("cannot be written");
        }
        logger.close().unwrap();

        assert_eq!(logger.metrics().write_errors(), 3);
        assert_eq!(logger.metrics().total_written(), 0);
    }

    #[test]
    fn test_handler_panic_does_not_stop_dispatch() {
        let logger = Logger::new(PanickingHandler).unwrap();
        logger.info("fine");
        logger.info("crash");
        logger.info("still fine");
        logger.close().unwrap();

        assert_eq!(logger.metrics().write_errors(), 1);
        assert_eq!(logger.metrics().total_written(), 2);
    }

    #[test]
    fn test_drop_newest_counts_overflow() {
        let (gate_tx, gate_rx) = bounded(0);
        let memory = MemoryHandler::new();
        let logger = Logger::builder()
            .handler(GatedHandler {
                gate: gate_rx,
                inner: memory.clone(),
            })
            .queue_capacity(2)
            .overflow_policy(OverflowPolicy::DropNewest)
            .build()
            .unwrap();

        // One record is held by the blocked handler, two fill the queue.
        logger.info("first");
        while logger.queued() > 0 {
            thread::sleep(Duration::from_millis(1));
        }
        logger.info("second");
        logger.info("third");
        logger.info("overflow a");
        logger.info("overflow b");

        assert_eq!(logger.metrics().dropped_count(), 2);
        assert_eq!(logger.metrics().queue_full_events(), 2);

        drop(gate_tx);
        logger.close().unwrap();
        assert_eq!(memory.len(), 3);
    }

    #[test]
    fn test_track_caller_wrapper_reports_application_line() {
        let memory = MemoryHandler::new();
        let logger = Logger::builder()
            .handler(memory.clone())
            .colors(false)
            .build()
            .unwrap();

        let expected_line = line!() + 1;
        log_through_wrapper(&logger, "from wrapper");
        logger.close().unwrap();

        let line = &memory.lines()[0];
        assert!(
            line.contains(&format!("logger.rs:[{}]", expected_line)),
            "unexpected call site in {:?}",
            line
        );
    }

    #[test]
    fn test_explicit_call_site() {
        let memory = MemoryHandler::new();
        let logger = Logger::builder()
            .handler(memory.clone())
            .colors(false)
            .build()
            .unwrap();

        logger.log_at(LogLevel::Info, CallSite::new("/srv/app/src/jobs.rs", 77), "tick");
        logger.log_at(LogLevel::Info, CallSite::unknown(), "lost");
        logger.close().unwrap();

        let lines = memory.lines();
        assert!(lines[0].contains(" - jobs.rs:[77] - tick"));
        assert!(lines[1].contains(" - ???:[0] - lost"));
    }

    #[test]
    fn test_debug_line_uses_overwrite_escapes() {
        let memory = MemoryHandler::new();
        let logger = Logger::new(memory.clone()).unwrap();
        logger.debug_line("50%");
        logger.close().unwrap();

        let line = &memory.lines()[0];
        assert!(line.starts_with("\x1b[1A"));
        assert!(line.ends_with("50%\x1b[K\n"));
    }

    #[test]
    fn test_buffers_return_to_pool() {
        let logger = Logger::new(MemoryHandler::new()).unwrap();
        for i in 0..10 {
            logger.info(format_args!("pooled {}", i));
        }
        logger.close().unwrap();

        let pooled = logger.buffer_pool().pooled();
        assert!(pooled >= 1 && pooled <= DEFAULT_POOL_SIZE);
    }
}
