//! Time-based rotating file handler
//!
//! The active file is always written at the configured path. When the
//! rotation deadline passes, the file is renamed with a timestamp suffix
//! (optionally gzip-compressed) and a fresh file is opened in its place.

use crate::core::{Handler, LoggerError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Unit of the rotation interval
///
/// Each unit also fixes the timestamp suffix given to rotated files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationWhen {
    Second,
    Minute,
    Hour,
    Day,
}

impl RotationWhen {
    pub fn period(&self) -> Duration {
        match self {
            RotationWhen::Second => Duration::from_secs(1),
            RotationWhen::Minute => Duration::from_secs(60),
            RotationWhen::Hour => Duration::from_secs(3600),
            RotationWhen::Day => Duration::from_secs(24 * 3600),
        }
    }

    /// strftime suffix appended to the base path of a rotated file
    pub fn suffix_format(&self) -> &'static str {
        match self {
            RotationWhen::Second => ".%Y-%m-%d_%H-%M-%S",
            RotationWhen::Minute => ".%Y-%m-%d_%H-%M",
            RotationWhen::Hour => ".%Y-%m-%d_%H",
            RotationWhen::Day => ".%Y-%m-%d",
        }
    }
}

impl fmt::Display for RotationWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationWhen::Second => write!(f, "second"),
            RotationWhen::Minute => write!(f, "minute"),
            RotationWhen::Hour => write!(f, "hour"),
            RotationWhen::Day => write!(f, "day"),
        }
    }
}

/// File handler rotating every `interval` units of [`RotationWhen`]
///
/// # Examples
///
/// ```no_run
/// use rust_async_logger::handlers::{RotationWhen, TimeRotatingFileHandler};
/// use rust_async_logger::Logger;
///
/// // New file every day, yesterday's kept as app.log.YYYY-MM-DD.gz
/// let handler = TimeRotatingFileHandler::new("/var/log/app.log", RotationWhen::Day, 1)
///     .unwrap()
///     .with_compression(true);
/// let logger = Logger::builder().handler(handler).colors(false).build().unwrap();
/// ```
pub struct TimeRotatingFileHandler {
    base_path: PathBuf,
    when: RotationWhen,
    interval: Duration,
    file: Option<File>,
    rollover_at: SystemTime,
    compress: bool,
}

impl TimeRotatingFileHandler {
    /// Open (or create) the log file at `path`
    ///
    /// The first rotation happens one interval after the file's last
    /// modification, so restarting a process does not reset the schedule.
    ///
    /// # Errors
    ///
    /// Returns error if `interval` is zero or the file cannot be opened
    pub fn new<P: AsRef<Path>>(path: P, when: RotationWhen, interval: u32) -> Result<Self> {
        if interval == 0 {
            return Err(LoggerError::config(
                "TimeRotatingFileHandler",
                "rotation interval must be greater than zero",
            ));
        }

        let base_path = path.as_ref().to_path_buf();
        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io("creating log directory", parent.display().to_string(), e)
            })?;
        }

        let file = Self::open(&base_path)?;
        let modified = file
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());
        let interval = when.period() * interval;

        Ok(Self {
            base_path,
            when,
            interval,
            file: Some(file),
            rollover_at: modified + interval,
            compress: false,
        })
    }

    /// Gzip rotated files
    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.base_path
    }

    pub fn when(&self) -> RotationWhen {
        self.when
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn rollover_at(&self) -> SystemTime {
        self.rollover_at
    }

    fn open(path: &Path) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| LoggerError::file_unavailable(path.display().to_string(), e.to_string()))
    }

    /// Path a file rotated at `now` is moved to
    pub fn rotated_path(&self, now: &DateTime<Local>) -> PathBuf {
        let mut name = OsString::from(self.base_path.as_os_str());
        name.push(now.format(self.when.suffix_format()).to_string());
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> Result<()> {
        // Release the handle before renaming
        drop(self.file.take());

        let now = Local::now();
        let rotated = self.rotated_path(&now);
        fs::rename(&self.base_path, &rotated).map_err(|e| {
            LoggerError::rotation(
                self.base_path.display().to_string(),
                format!("cannot rename to '{}': {}", rotated.display(), e),
            )
        })?;

        self.file = Some(Self::open(&self.base_path)?);
        self.rollover_at = SystemTime::from(now) + self.interval;

        if self.compress {
            compress_file(&rotated)?;
        }
        Ok(())
    }

    fn recover_after_failed_rotation(&mut self) -> Result<()> {
        // Retry at the next deadline rather than on every write
        self.rollover_at = SystemTime::now() + self.interval;
        if self.file.is_none() {
            self.file = Some(Self::open(&self.base_path)?);
        }
        Ok(())
    }
}

/// Gzip `path` into `path.gz` through a temporary file, removing the original
/// only once the compressed copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    let mut gz_name = OsString::from(path.as_os_str());
    gz_name.push(".gz");
    let gz_path = PathBuf::from(gz_name);
    let mut tmp_name = OsString::from(gz_path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp_path)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());

        let mut chunk = vec![0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            encoder.write_all(&chunk[..n])?;
        }
        encoder.finish()?.flush()?;
        fs::rename(&tmp_path, &gz_path)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(LoggerError::io("compressing rotated log", path.display().to_string(), e));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed '{}' but could not remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Handler for TimeRotatingFileHandler {
    fn write(&mut self, record: &[u8]) -> Result<()> {
        if SystemTime::now() >= self.rollover_at {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                self.recover_after_failed_rotation()?;
            }
        }

        let path = &self.base_path;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::file_unavailable(path.display().to_string(), "handler is closed"))?;
        file.write_all(record)
            .map_err(|e| LoggerError::io("writing log record", path.display().to_string(), e))
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all().map_err(|e| {
                LoggerError::io("closing log file", self.base_path.display().to_string(), e)
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "time_rotating_file"
    }
}
