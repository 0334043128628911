//! Stream handler writing to stdout, stderr or any `io::Write`

use crate::core::{Handler, LoggerError, Result};
use std::io::{self, Write};

pub struct StreamHandler<W: Write + Send> {
    writer: W,
    name: &'static str,
}

impl StreamHandler<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            writer: io::stdout(),
            name: "stdout",
        }
    }
}

impl StreamHandler<io::Stderr> {
    pub fn stderr() -> Self {
        Self {
            writer: io::stderr(),
            name: "stderr",
        }
    }
}

impl<W: Write + Send> StreamHandler<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "stream",
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Handler for StreamHandler<W> {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        self.writer
            .write_all(record)
            .and_then(|_| self.writer.flush())
            .map_err(|e| {
                LoggerError::io("writing log record", format!("{} stream", self.name), e)
            })
    }

    fn close(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}
