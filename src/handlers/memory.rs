//! In-memory handler
//!
//! Clones share the same storage, so one clone can be given to a logger while
//! another is kept to inspect what was written.

use crate::core::{Handler, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemoryHandler {
    records: Arc<Mutex<Vec<Vec<u8>>>>,
    closes: Arc<AtomicUsize>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every record written so far, in write order
    pub fn records(&self) -> Vec<Vec<u8>> {
        self.records.lock().clone()
    }

    /// Records decoded as UTF-8 (lossy)
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.close_count() > 0
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }
}

impl Handler for MemoryHandler {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        self.records.lock().push(record.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
