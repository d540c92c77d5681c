//! Writer metrics for observability
//!
//! Counters describing what the writer has done to the filesystem: lines
//! and bytes appended, flushes, rotations and retention deletions, plus the
//! failures that the best-effort paths log and suppress.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for log writer observability
///
/// # Example
///
/// ```
/// use rust_file_logger::WriterMetrics;
///
/// let metrics = WriterMetrics::new();
///
/// metrics.record_line(42);
/// metrics.record_flush();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.bytes_written(), 42);
/// assert_eq!(metrics.flushes(), 1);
/// ```
#[derive(Debug)]
pub struct WriterMetrics {
    /// Lines appended to an active file
    lines_written: AtomicU64,

    /// Bytes appended to an active file
    bytes_written: AtomicU64,

    /// Successful flushes, periodic or explicit
    flushes: AtomicU64,

    /// Flushes that failed and were suppressed
    flush_failures: AtomicU64,

    /// Closes whose final flush failed
    close_failures: AtomicU64,

    /// Active files renamed to backups
    rotations: AtomicU64,

    /// Backups removed by retention
    backups_deleted: AtomicU64,

    /// Backups retention tried and failed to remove
    deletion_failures: AtomicU64,
}

impl WriterMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            lines_written: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            close_failures: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            backups_deleted: AtomicU64::new(0),
            deletion_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn close_failures(&self) -> u64 {
        self.close_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn backups_deleted(&self) -> u64 {
        self.backups_deleted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deletion_failures(&self) -> u64 {
        self.deletion_failures.load(Ordering::Relaxed)
    }

    /// Record one appended line of `bytes` length
    #[inline]
    pub fn record_line(&self, bytes: u64) {
        self.lines_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_failure(&self) -> u64 {
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_close_failure(&self) -> u64 {
        self.close_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    /// Record the outcome of one retention pass
    #[inline]
    pub fn record_retention(&self, deleted: usize, failed: usize) {
        self.backups_deleted
            .fetch_add(deleted as u64, Ordering::Relaxed);
        self.deletion_failures
            .fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.lines_written.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.flush_failures.store(0, Ordering::Relaxed);
        self.close_failures.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.backups_deleted.store(0, Ordering::Relaxed);
        self.deletion_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for WriterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WriterMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            lines_written: AtomicU64::new(self.lines_written()),
            bytes_written: AtomicU64::new(self.bytes_written()),
            flushes: AtomicU64::new(self.flushes()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            close_failures: AtomicU64::new(self.close_failures()),
            rotations: AtomicU64::new(self.rotations()),
            backups_deleted: AtomicU64::new(self.backups_deleted()),
            deletion_failures: AtomicU64::new(self.deletion_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = WriterMetrics::new();
        assert_eq!(metrics.lines_written(), 0);
        assert_eq!(metrics.bytes_written(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.rotations(), 0);
        assert_eq!(metrics.backups_deleted(), 0);
    }

    #[test]
    fn test_record_line_accumulates_bytes() {
        let metrics = WriterMetrics::new();
        metrics.record_line(10);
        metrics.record_line(32);
        assert_eq!(metrics.lines_written(), 2);
        assert_eq!(metrics.bytes_written(), 42);
    }

    #[test]
    fn test_record_retention() {
        let metrics = WriterMetrics::new();
        metrics.record_retention(3, 1);
        metrics.record_retention(2, 0);
        assert_eq!(metrics.backups_deleted(), 5);
        assert_eq!(metrics.deletion_failures(), 1);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = WriterMetrics::new();
        metrics.record_line(5);
        metrics.record_flush_failure();
        metrics.record_rotation();

        metrics.reset();

        assert_eq!(metrics.lines_written(), 0);
        assert_eq!(metrics.flush_failures(), 0);
        assert_eq!(metrics.rotations(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = WriterMetrics::new();
        metrics.record_flush();

        let snapshot = metrics.clone();
        metrics.record_flush();

        assert_eq!(metrics.flushes(), 2);
        assert_eq!(snapshot.flushes(), 1);
    }
}
