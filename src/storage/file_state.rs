//! The active log file
//!
//! Tracks which file is currently open for append, the buffered writer over
//! it and how many bytes it holds. At most one file is open at a time;
//! callers serialize access through the writer's lock.

use crate::core::error::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// A file opened for append
#[derive(Debug)]
pub struct ActiveFile {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    /// On-disk length at open plus every byte written since
    size: u64,
}

impl ActiveFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Length on disk plus buffered bytes; the tracked size if metadata fails
    pub fn current_len(&self) -> u64 {
        self.writer
            .get_ref()
            .metadata()
            .map(|meta| meta.len() + self.writer.buffer().len() as u64)
            .unwrap_or(self.size)
    }
}

/// Lifecycle of the single active file
#[derive(Debug, Default)]
pub struct FileState {
    active: Option<ActiveFile>,
}

impl FileState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `directory/name` for append, replacing any other open file
    ///
    /// Does nothing when `name` is already the active file. The previous
    /// file is closed first and a failure to close it is only logged.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be created or opened; no file is
    /// left open in that case.
    pub fn open(&mut self, directory: &Path, name: &str, buffer_size: usize) -> Result<()> {
        if self.current_name() == Some(name) {
            return Ok(());
        }

        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to close previous log file");
        }

        let path = directory.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::file_writer(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_writer(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        tracing::debug!(path = %path.display(), size, "opened log file");

        self.active = Some(ActiveFile {
            name: name.to_string(),
            path,
            writer: BufWriter::with_capacity(buffer_size.max(1), file),
            size,
        });
        Ok(())
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&str> {
        self.active.as_ref().map(ActiveFile::name)
    }

    #[must_use]
    pub fn current_path(&self) -> Option<&Path> {
        self.active.as_ref().map(ActiveFile::path)
    }

    #[must_use]
    pub fn active(&self) -> Option<&ActiveFile> {
        self.active.as_ref()
    }

    /// Writer of the active file, for in-flight writes
    pub fn writer(&mut self) -> Option<&mut BufWriter<File>> {
        self.active.as_mut().map(|active| &mut active.writer)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Append `line` to the active file, returning the bytes written
    ///
    /// # Errors
    ///
    /// Returns `NotReady` with no file open, or the write failure
    pub fn write_line(&mut self, line: &str) -> Result<u64> {
        let active = self
            .active
            .as_mut()
            .ok_or_else(|| LoggerError::not_ready("write"))?;

        active.writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::file_writer(
                active.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;

        let bytes = line.len() as u64;
        active.size += bytes;
        Ok(bytes)
    }

    /// Flush buffered lines of the active file, if any
    ///
    /// # Errors
    ///
    /// Returns error if the underlying write fails
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut active) = self.active {
            active.writer.flush().map_err(|e| {
                LoggerError::file_writer(
                    active.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }

    /// Flush and close the active file, clearing all state
    ///
    /// State is cleared even when the final flush fails.
    ///
    /// # Errors
    ///
    /// Returns the flush failure so the caller can report it
    pub fn close(&mut self) -> Result<()> {
        let Some(mut active) = self.active.take() else {
            return Ok(());
        };

        let result = active.writer.flush().map_err(|e| {
            LoggerError::file_writer(
                active.path.display().to_string(),
                format!("Failed to flush on close: {}", e),
            )
        });
        tracing::debug!(path = %active.path.display(), "closed log file");
        result
    }

    /// Whether the active file has reached `max_bytes`
    ///
    /// Measured as the file's length on disk plus unflushed bytes, so a file
    /// truncated while open stops counting as full.
    #[must_use]
    pub fn size_limited(&self, max_bytes: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.current_len() >= max_bytes)
    }
}

impl Drop for FileState {
    fn drop(&mut self) {
        // Best effort flush - ignore errors during drop
        let _ = self.close();
    }
}
