//! Source location attached to each rendered record

use std::fmt;
use std::panic::Location;

/// File name printed when the location is unknown
pub const UNKNOWN_FILE: &str = "???";

/// Where a log call was made.
///
/// The location is passed down explicitly instead of being looked up by
/// walking the stack. Logger methods are `#[track_caller]`, so a helper that
/// wraps them and is itself `#[track_caller]` reports its own caller's line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Placeholder used when no location is available
    pub const fn unknown() -> Self {
        Self {
            file: UNKNOWN_FILE,
            line: 0,
        }
    }

    /// Location of the (track_caller-propagated) caller
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Final path segment of the file, or the placeholder if it is empty
    pub fn short_file(&self) -> &'static str {
        let short = match self.file.rfind(['/', '\\']) {
            Some(idx) => &self.file[idx + 1..],
            None => self.file,
        };
        if short.is_empty() {
            UNKNOWN_FILE
        } else {
            short
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.short_file() == UNKNOWN_FILE
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for CallSite {
    /// Renders as `file:[line]`, with line 0 for unknown locations
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = if self.is_unknown() { 0 } else { self.line };
        write!(f, "{}:[{}]", self.short_file(), line)
    }
}
