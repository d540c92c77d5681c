//! Configuration for the log writer
//!
//! Every knob has the default the writer has always used: 32 KiB write
//! buffer, 100 MiB size threshold, 5 second flush interval and five
//! retained backups ending in `.bak`.

use super::error::{LoggerError, Result};
use super::timestamp::TimeZoneMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One mebibyte, the unit of capacity settings
pub const MIB: u64 = 1024 * 1024;

/// Default write buffer size in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// Default size at which the active file is reported as full
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * MIB;

/// Default interval between periodic flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(5000);

/// Backups kept by release builds
pub const DEFAULT_RETENTION_LIMIT: usize = 5;

/// Backups kept by debug builds
pub const DEBUG_RETENTION_LIMIT: usize = 10;

/// Suffix that marks a file as a rotated backup
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Configuration for [`LogWriter`](crate::LogWriter)
///
/// # Examples
///
/// ```
/// use rust_file_logger::{TimeZoneMode, WriterConfig};
/// use std::time::Duration;
///
/// let config = WriterConfig::new()
///     .with_max_file_size(10 * 1024 * 1024)
///     .with_flush_interval(Duration::from_secs(1))
///     .with_retention_limit(3)
///     .with_time_zone(TimeZoneMode::Utc);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Capacity of the buffered writer for newly opened files
    pub buffer_size: usize,
    /// Byte length at which `is_size_limited` reports true
    pub max_file_size: u64,
    /// Maximum time between flushes while lines keep arriving
    pub flush_interval: Duration,
    /// Number of backups retention keeps
    pub retention_limit: usize,
    /// Suffix identifying backup files
    pub backup_suffix: String,
    /// Zone for line timestamps and backup name tokens
    pub time_zone: TimeZoneMode,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            retention_limit: DEFAULT_RETENTION_LIMIT,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            time_zone: TimeZoneMode::default(),
        }
    }
}

impl WriterConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with the larger backup allowance used for debug builds
    #[must_use]
    pub fn debug() -> Self {
        Self::default().with_retention_limit(DEBUG_RETENTION_LIMIT)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_retention_limit(mut self, count: usize) -> Self {
        self.retention_limit = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_backup_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.backup_suffix = suffix.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_time_zone(mut self, zone: TimeZoneMode) -> Self {
        self.time_zone = zone;
        self
    }

    /// Maximum file size in whole mebibytes, never less than one
    #[must_use]
    pub fn max_file_size_mb(&self) -> u64 {
        (self.max_file_size / MIB).max(1)
    }

    /// Backup count that fits `total_capacity_mb` of disk
    ///
    /// Returns `None` for a non-positive capacity.
    #[must_use]
    pub fn retention_limit_for_capacity(&self, total_capacity_mb: i64) -> Option<usize> {
        let capacity = u64::try_from(total_capacity_mb).ok().filter(|c| *c > 0)?;
        usize::try_from(capacity / self.max_file_size_mb()).ok()
    }

    /// Check the configuration for values the writer cannot work with
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` naming the offending field
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(LoggerError::config("WriterConfig", "buffer_size must be non-zero"));
        }
        if self.max_file_size == 0 {
            return Err(LoggerError::config("WriterConfig", "max_file_size must be non-zero"));
        }
        if self.flush_interval.is_zero() {
            return Err(LoggerError::config("WriterConfig", "flush_interval must be non-zero"));
        }
        if self.backup_suffix.is_empty() {
            return Err(LoggerError::config("WriterConfig", "backup_suffix must not be empty"));
        }
        Ok(())
    }
}
