//! Text rendering of a single log record
//!
//! Output layout:
//!
//! ```text
//! 2024/05/01 13:45:09 - INFO - server.rs:[42] - listening on :8080
//! ```
//!
//! Only the level label is colorized. Escape codes come straight from the
//! [`colored::Color`] table so output does not depend on terminal detection.

use super::call_site::CallSite;
use super::log_level::LogLevel;
use chrono::{DateTime, TimeZone};
use std::fmt;
use std::io::Write;

/// Timestamp layout, `YYYY/MM/DD HH:MM:SS`
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const SEPARATOR: &[u8] = b" - ";
const COLOR_RESET: &[u8] = b"\x1b[0m";
const CURSOR_UP: &[u8] = b"\x1b[1A";
const CLEAR_TO_EOL: &[u8] = b"\x1b[K";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Wrap the level label in ANSI color codes
    pub colors: bool,
    /// Redraw the previous terminal line instead of starting a new one
    pub overwrite_line: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colors: true,
            overwrite_line: false,
        }
    }
}

impl RenderOptions {
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    #[must_use]
    pub fn with_overwrite_line(mut self, overwrite_line: bool) -> Self {
        self.overwrite_line = overwrite_line;
        self
    }
}

/// Append one rendered record to `buf`.
///
/// A trailing newline is added unless the message already ends with one.
pub fn render<Tz, M>(
    buf: &mut Vec<u8>,
    timestamp: &DateTime<Tz>,
    level: LogLevel,
    call_site: CallSite,
    message: &M,
    options: RenderOptions,
) where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    M: fmt::Display + ?Sized,
{
    if options.overwrite_line {
        buf.extend_from_slice(CURSOR_UP);
    }

    // Writes into a Vec only fail if a Display impl reports an error; the
    // partial output is kept in that case.
    let _ = write!(buf, "{}", timestamp.format(TIME_FORMAT));
    buf.extend_from_slice(SEPARATOR);

    write_level(buf, level, options.colors);
    buf.extend_from_slice(SEPARATOR);

    let _ = write!(buf, "{}", call_site);
    buf.extend_from_slice(SEPARATOR);

    let message_start = buf.len();
    let _ = write!(buf, "{}", message);
    let ends_with_newline = buf.len() > message_start && buf.last() == Some(&b'\n');

    if options.overwrite_line {
        buf.extend_from_slice(CLEAR_TO_EOL);
    }
    if !ends_with_newline {
        buf.push(b'\n');
    }
}

fn write_level(buf: &mut Vec<u8>, level: LogLevel, colors: bool) {
    match level.color_code().filter(|_| colors) {
        Some(color) => {
            let _ = write!(buf, "\x1b[{}m", color.to_fg_str());
            buf.extend_from_slice(level.to_str().as_bytes());
            buf.extend_from_slice(COLOR_RESET);
        }
        None => buf.extend_from_slice(level.to_str().as_bytes()),
    }
}
