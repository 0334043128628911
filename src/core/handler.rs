//! Handler trait for log output destinations

use super::error::Result;

/// Sink receiving fully rendered records.
///
/// A handler is owned by exactly one dispatch thread, so it only needs to be
/// `Send`. Write failures are counted by the logger and never reach callers.
pub trait Handler: Send {
    /// Write one rendered record
    fn write(&mut self, record: &[u8]) -> Result<()>;

    /// Flush and release the sink; called once after the last write
    fn close(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        (**self).write(record)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
