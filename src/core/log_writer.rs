//! The log writer façade
//!
//! `LogWriter` owns the log directory, the active file and the flush
//! tracker. Every operation touching the active file runs under one mutex,
//! so concurrent `write` calls never interleave partial lines.

use super::{
    config::WriterConfig,
    error::{LoggerError, Result},
    metrics::WriterMetrics,
    timestamp::{backup_file_name, format_log_time},
};
use crate::storage::{FileState, RetentionManager, RetentionReport};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Paths a caller needs to collect or upload the logs of one file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    /// The log directory
    pub directory: PathBuf,
    /// The active file, or where it would be created
    pub current_file: PathBuf,
    /// The most recently created backup, if any exists
    pub latest_backup: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct WriterState {
    files: FileState,
    /// Monotonic time of the last periodic flush, shared by every file this
    /// writer opens
    last_flush: Option<Instant>,
}

/// Thread-safe, size-bounded log file writer
///
/// # Examples
///
/// ```no_run
/// use rust_file_logger::LogWriter;
/// use std::sync::Arc;
///
/// let writer = Arc::new(LogWriter::new());
/// assert!(writer.initialize("/var/log/app"));
/// writer.ready("app.log").unwrap();
///
/// let now = chrono::Utc::now().timestamp_millis();
/// writer.write("service started", now, false).unwrap();
///
/// if writer.is_size_limited() {
///     writer.rotate().unwrap();
/// }
/// writer.close();
/// ```
#[derive(Debug)]
pub struct LogWriter {
    config: WriterConfig,
    directory: RwLock<Option<PathBuf>>,
    state: Mutex<WriterState>,
    buffer_size: AtomicUsize,
    retention_limit: AtomicUsize,
    retention: RetentionManager,
    metrics: Arc<WriterMetrics>,
}

impl LogWriter {
    /// Create an uninitialized writer with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(WriterConfig::default())
    }

    /// Create an uninitialized writer with custom settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the config does not validate
    pub fn with_config(config: WriterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: WriterConfig) -> Self {
        Self {
            directory: RwLock::new(None),
            state: Mutex::new(WriterState::default()),
            buffer_size: AtomicUsize::new(config.buffer_size),
            retention_limit: AtomicUsize::new(config.retention_limit),
            retention: RetentionManager::new(config.backup_suffix.clone(), config.time_zone),
            metrics: Arc::new(WriterMetrics::new()),
            config,
        }
    }

    /// Set the log directory, creating it if needed
    ///
    /// Once a directory is set, later calls succeed without doing anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a blank path or a path that is not
    /// a directory, and an IO error if the directory cannot be created
    pub fn try_initialize(&self, directory: impl AsRef<Path>) -> Result<()> {
        let directory = directory.as_ref();
        let mut current = self.directory.write();
        if current.is_some() {
            return Ok(());
        }

        if directory.to_string_lossy().trim().is_empty() {
            return Err(LoggerError::config("LogWriter", "log directory is empty"));
        }

        let directory = if directory.is_absolute() {
            directory.to_path_buf()
        } else {
            std::env::current_dir()?.join(directory)
        };

        if let Err(e) = fs::create_dir_all(&directory) {
            if !directory.exists() {
                return Err(LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", directory.display()),
                    e,
                ));
            }
        }

        if !directory.is_dir() {
            return Err(LoggerError::config(
                "LogWriter",
                format!("'{}' is not a directory", directory.display()),
            ));
        }

        tracing::debug!(directory = %directory.display(), "log writer initialized");
        *current = Some(directory);
        Ok(())
    }

    /// Set the log directory, reporting failure as `false`
    pub fn initialize(&self, directory: impl AsRef<Path>) -> bool {
        match self.try_initialize(directory) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to initialize log writer");
                false
            }
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.directory.read().is_some()
    }

    /// The log directory, once initialized
    #[must_use]
    pub fn log_directory(&self) -> Option<PathBuf> {
        self.directory.read().clone()
    }

    #[must_use]
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> Arc<WriterMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Make `name` the active file
    ///
    /// Returns `Ok(false)` when the writer is not initialized or `name` is
    /// blank. Switching to a different name closes the previous file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened
    pub fn ready(&self, name: &str) -> Result<bool> {
        let Some(directory) = self.log_directory() else {
            return Ok(false);
        };
        if name.trim().is_empty() {
            return Ok(false);
        }

        let mut state = self.state.lock();
        state
            .files
            .open(&directory, name, self.buffer_size.load(Ordering::Relaxed))?;
        Ok(true)
    }

    /// Render one log line: `<yyyy-MM-dd HH:mm:ss.SSS> <message>\n`
    #[must_use]
    pub fn format_line(&self, message: &str, timestamp_millis: i64) -> String {
        let time = format_log_time(timestamp_millis, self.config.time_zone);
        let mut line = String::with_capacity(time.len() + message.len() + 2);
        line.push_str(&time);
        line.push(' ');
        line.push_str(message);
        line.push('\n');
        line
    }

    /// Append one line to the active file
    ///
    /// Does nothing when the writer is not initialized or no file is open.
    /// Buffered lines are flushed once the flush interval has elapsed since
    /// the last periodic flush. With `close_after_write` the file is flushed
    /// and closed right after this line, so it survives an abrupt exit.
    ///
    /// # Errors
    ///
    /// Returns the write failure; the file stays open and nothing is retried
    pub fn write(&self, message: &str, timestamp_millis: i64, close_after_write: bool) -> Result<()> {
        if !self.is_initialized() {
            return Ok(());
        }
        let line = self.format_line(message, timestamp_millis);

        let mut state = self.state.lock();
        if !state.files.is_open() {
            return Ok(());
        }

        let bytes = state.files.write_line(&line)?;
        self.metrics.record_line(bytes);

        let now = Instant::now();
        let flush_due = state
            .last_flush
            .map_or(true, |last| now.duration_since(last) >= self.config.flush_interval);
        if flush_due {
            match state.files.flush() {
                Ok(()) => {
                    self.metrics.record_flush();
                }
                Err(e) => {
                    self.metrics.record_flush_failure();
                    tracing::warn!(error = %e, "periodic flush failed");
                }
            }
            state.last_flush = Some(now);
        }

        if close_after_write {
            if let Err(e) = state.files.close() {
                self.metrics.record_close_failure();
                tracing::warn!(error = %e, "failed to close log file after write");
            }
        }
        Ok(())
    }

    /// Flush the active file
    ///
    /// # Errors
    ///
    /// Returns the flush failure
    pub fn try_flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if !state.files.is_open() {
            return Ok(());
        }
        state.files.flush()?;
        self.metrics.record_flush();
        Ok(())
    }

    /// Flush the active file, logging any failure
    pub fn flush(&self) {
        if let Err(e) = self.try_flush() {
            self.metrics.record_flush_failure();
            tracing::warn!(error = %e, "failed to flush log file");
        }
    }

    /// Close the active file
    ///
    /// The file state is cleared even when the final flush fails.
    ///
    /// # Errors
    ///
    /// Returns the flush failure
    pub fn try_close(&self) -> Result<()> {
        self.state.lock().files.close()
    }

    /// Close the active file, logging any failure
    pub fn close(&self) {
        if let Err(e) = self.try_close() {
            self.metrics.record_close_failure();
            tracing::warn!(error = %e, "failed to close log file");
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.lock().files.is_open()
    }

    /// Whether the active file has reached the configured maximum size
    #[must_use]
    pub fn is_size_limited(&self) -> bool {
        self.state
            .lock()
            .files
            .size_limited(self.config.max_file_size)
    }

    /// Size the backup count to fit `total_capacity_mb` of disk
    ///
    /// The limit becomes `total_capacity_mb / max_file_size_mb` and applies to
    /// the next retention pass. Non-positive capacities are ignored.
    pub fn set_retention_limit(&self, total_capacity_mb: i64) {
        if let Some(limit) = self.config.retention_limit_for_capacity(total_capacity_mb) {
            self.retention_limit.store(limit, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn retention_limit(&self) -> usize {
        self.retention_limit.load(Ordering::Relaxed)
    }

    /// Buffer size for the next file opened; zero is ignored
    pub fn set_buffer_size(&self, bytes: usize) {
        if bytes == 0 {
            tracing::warn!("ignoring zero log buffer size");
            return;
        }
        self.buffer_size.store(bytes, Ordering::Relaxed);
    }

    #[must_use]
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.load(Ordering::Relaxed)
    }

    /// Directory, current file and newest backup for `file_name`
    ///
    /// # Errors
    ///
    /// Returns `NotReady` before initialization, `InvalidConfiguration` for a
    /// blank name, or an IO error if the directory cannot be listed
    pub fn resolve_paths(&self, file_name: &str) -> Result<PathInfo> {
        let directory = self
            .log_directory()
            .ok_or_else(|| LoggerError::not_ready("resolve_paths"))?;
        if file_name.trim().is_empty() {
            return Err(LoggerError::config("LogWriter", "file name is empty"));
        }

        let current_file = self
            .state
            .lock()
            .files
            .current_path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| directory.join(file_name));
        let latest_backup = self.retention.latest_backup(&directory)?;

        Ok(PathInfo {
            directory,
            current_file,
            latest_backup,
        })
    }

    /// Delete backups beyond the retention limit
    ///
    /// Runs without the file lock; it only touches backup files.
    ///
    /// # Errors
    ///
    /// Returns `NotReady` before initialization, or an IO error if the
    /// directory cannot be listed
    pub fn enforce_retention(&self) -> Result<RetentionReport> {
        let directory = self
            .log_directory()
            .ok_or_else(|| LoggerError::not_ready("enforce_retention"))?;

        let report = self.retention.enforce(&directory, self.retention_limit())?;
        self.metrics
            .record_retention(report.deleted.len(), report.failed.len());
        Ok(report)
    }

    /// Rotate the active file to a backup stamped with the current time
    ///
    /// # Errors
    ///
    /// See [`rotate_at`](Self::rotate_at)
    pub fn rotate(&self) -> Result<PathBuf> {
        self.rotate_at(Utc::now())
    }

    /// Rotate the active file to a backup stamped with `at`
    ///
    /// Under the file lock, the active file is closed, renamed to
    /// `<stem>-yyyyMMdd-HHmmss.SSS<suffix>` and a fresh file is opened under
    /// the same name. Retention then runs outside the lock; its failure is
    /// only logged. Returns the backup path.
    ///
    /// # Errors
    ///
    /// Returns `NotReady` with no active file, or a rotation error if the
    /// rename fails; the active file is reopened in that case
    pub fn rotate_at(&self, at: DateTime<Utc>) -> Result<PathBuf> {
        let directory = self
            .log_directory()
            .ok_or_else(|| LoggerError::not_ready("rotate"))?;

        let backup = {
            let mut state = self.state.lock();
            let (name, path) = match state.files.active() {
                Some(active) => (active.name().to_string(), active.path().to_path_buf()),
                None => return Err(LoggerError::not_ready("rotate")),
            };

            if let Err(e) = state.files.close() {
                self.metrics.record_close_failure();
                tracing::warn!(error = %e, "failed to close log file before rotation");
            }

            let backup = directory.join(backup_file_name(
                &name,
                &at,
                self.config.time_zone,
                &self.config.backup_suffix,
            ));
            let renamed = if backup.exists() {
                Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "backup file already exists",
                ))
            } else {
                fs::rename(&path, &backup)
            };

            let reopened = state
                .files
                .open(&directory, &name, self.buffer_size.load(Ordering::Relaxed));

            if let Err(e) = renamed {
                if let Err(reopen_err) = &reopened {
                    tracing::warn!(
                        path = %path.display(),
                        error = %reopen_err,
                        "failed to reopen log file after failed rotation"
                    );
                }
                return Err(LoggerError::file_rotation(
                    path.display().to_string(),
                    format!("Failed to rename to '{}': {}", backup.display(), e),
                ));
            }
            reopened?;
            backup
        };

        self.metrics.record_rotation();
        tracing::debug!(backup = %backup.display(), "rotated log file");

        if let Err(e) = self.enforce_retention() {
            tracing::warn!(error = %e, "retention after rotation failed");
        }
        Ok(backup)
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}
