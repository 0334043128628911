//! Free list of reusable byte buffers
//!
//! Producers check a buffer out, render a record into it and hand it to the
//! dispatch thread, which gives it back after writing. The pool is a cache:
//! when it is full, returned buffers are simply dropped.

use parking_lot::Mutex;

/// Maximum number of buffers kept on the free list
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Starting capacity of freshly allocated buffers
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    max_pooled: usize,
    buffer_capacity: usize,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_POOL_SIZE, DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_limits(max_pooled: usize, buffer_capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_pooled)),
            max_pooled,
            buffer_capacity,
        }
    }

    /// Take an empty buffer, reusing a pooled one when available
    pub fn acquire(&self) -> Vec<u8> {
        let pooled = self.free.lock().pop();
        pooled.unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity))
    }

    /// Return a buffer; its contents are discarded, its capacity kept
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_pooled {
            free.push(buf);
        }
    }

    /// Number of buffers currently held on the free list
    pub fn pooled(&self) -> usize {
        self.free.lock().len()
    }

    pub fn max_pooled(&self) -> usize {
        self.max_pooled
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
