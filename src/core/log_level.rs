//! Log level definitions
//!
//! Levels are bit flags. A logger filters with a [`LevelMask`], so any subset of
//! levels can be enabled, not only "everything above X".

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    Info = 1,
    Debug = 1 << 1,
    Warn = 1 << 2,
    Error = 1 << 3,
}

impl LogLevel {
    /// Every level, in label lookup order.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Label color, `None` for levels printed without color.
    pub fn color_code(&self) -> Option<colored::Color> {
        use colored::Color::*;
        match self {
            LogLevel::Debug => None,
            LogLevel::Info => Some(Green),
            LogLevel::Warn => Some(Yellow),
            LogLevel::Error => Some(Red),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

/// Set of enabled levels.
///
/// A record at level `S` passes the mask `L` iff `(L & S) == S`.
///
/// # Example
///
/// ```
/// use rust_async_logger::{LevelMask, LogLevel};
///
/// let mask = LogLevel::Warn | LogLevel::Error;
/// assert!(mask.contains(LogLevel::Error));
/// assert!(!mask.contains(LogLevel::Info));
/// assert_eq!(mask.to_string(), "WARN|ERROR");
/// assert_eq!("warn|error".parse::<LevelMask>().unwrap(), mask);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelMask(u8);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const ALL: LevelMask = LevelMask(
        LogLevel::Info.bit() | LogLevel::Debug.bit() | LogLevel::Warn.bit() | LogLevel::Error.bit(),
    );

    /// Build a mask from raw bits; bits outside [`LevelMask::ALL`] are discarded.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        LevelMask(bits & LevelMask::ALL.0)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() == level.bit()
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn levels(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL.into_iter().filter(move |l| self.contains(*l))
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        LevelMask::ALL
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        LevelMask(level.bit())
    }
}

impl BitOr for LogLevel {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.bit() | rhs.bit())
    }
}

impl BitOr<LogLevel> for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LogLevel) -> LevelMask {
        LevelMask(self.0 | rhs.bit())
    }
}

impl BitOr for LevelMask {
    type Output = LevelMask;

    fn bitor(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 | rhs.0)
    }
}

impl BitOrAssign<LogLevel> for LevelMask {
    fn bitor_assign(&mut self, rhs: LogLevel) {
        self.0 |= rhs.bit();
    }
}

impl BitAnd for LevelMask {
    type Output = LevelMask;

    fn bitand(self, rhs: LevelMask) -> LevelMask {
        LevelMask(self.0 & rhs.0)
    }
}

impl fmt::Display for LevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == LevelMask::ALL {
            return f.write_str("ALL");
        }
        if self.is_empty() {
            return f.write_str("NONE");
        }
        // Display order follows severity rather than bit order
        let ordered = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];
        let mut first = true;
        for level in ordered.into_iter().filter(|l| self.contains(*l)) {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(level.to_str())?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for LevelMask {
    type Err = LoggerError;

    /// Accepts `all`, `none`, or level names separated by `|` or `,`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_uppercase().as_str() {
            "ALL" => return Ok(LevelMask::ALL),
            "NONE" | "" => return Ok(LevelMask::NONE),
            _ => {}
        }

        let mut mask = LevelMask::NONE;
        for part in trimmed.split(['|', ',']) {
            let level: LogLevel = part.parse().map_err(|_| LoggerError::invalid_level(s))?;
            mask |= level;
        }
        Ok(mask)
    }
}

impl TryFrom<String> for LevelMask {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelMask> for String {
    fn from(mask: LevelMask) -> Self {
        mask.to_string()
    }
}
