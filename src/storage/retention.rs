//! Backup retention
//!
//! Finds rotated backups in the log directory, orders them by the creation
//! time encoded in their names and removes the oldest beyond a count limit.

use crate::core::error::{LoggerError, Result};
use crate::core::timestamp::{parse_backup_timestamp, TimeZoneMode};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Outcome of one retention pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RetentionReport {
    /// Backups kept, newest first
    pub retained: Vec<PathBuf>,
    /// Backups removed
    pub deleted: Vec<PathBuf>,
    /// Backups that could not be removed
    pub failed: Vec<PathBuf>,
}

impl RetentionReport {
    /// Whether the pass removed or tried to remove anything
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.failed.is_empty()
    }
}

#[derive(Debug)]
struct Backup {
    path: PathBuf,
    name: String,
    /// `None` when neither the name nor the metadata yields a time
    created: Option<DateTime<Utc>>,
}

/// Newest first; undated backups sort oldest, equal times fall back to the
/// name, descending
fn newest_first(a: &Backup, b: &Backup) -> Ordering {
    b.created
        .cmp(&a.created)
        .then_with(|| b.name.cmp(&a.name))
}

/// Count-based pruning of backup files
///
/// # Examples
///
/// ```no_run
/// use rust_file_logger::storage::RetentionManager;
/// use rust_file_logger::TimeZoneMode;
/// use std::path::Path;
///
/// let retention = RetentionManager::new(".bak", TimeZoneMode::Local);
/// let report = retention.enforce(Path::new("/var/log/app"), 5).unwrap();
/// println!("removed {} old backups", report.deleted.len());
/// ```
#[derive(Debug, Clone)]
pub struct RetentionManager {
    suffix: String,
    zone: TimeZoneMode,
}

impl RetentionManager {
    #[must_use]
    pub fn new(suffix: impl Into<String>, zone: TimeZoneMode) -> Self {
        Self {
            suffix: suffix.into(),
            zone,
        }
    }

    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether `file_name` carries the backup suffix
    #[must_use]
    pub fn is_backup(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }

    /// Creation time of a backup
    ///
    /// Read from the time token in the file name, or the last-modified time
    /// when the name has none. Returns `None` for files that are not backups
    /// or whose metadata cannot be read.
    #[must_use]
    pub fn backup_time(&self, path: &Path) -> Option<DateTime<Utc>> {
        let name = path.file_name()?.to_string_lossy();
        if !self.is_backup(&name) {
            return None;
        }

        parse_backup_timestamp(&name, self.zone).or_else(|| {
            tracing::debug!(file = %name, "backup name has no time token, using mtime");
            let modified = fs::metadata(path).ok()?.modified().ok()?;
            Some(DateTime::<Utc>::from(modified))
        })
    }

    fn list_backups(&self, directory: &Path) -> Result<Vec<Backup>> {
        let entries = fs::read_dir(directory).map_err(|e| {
            LoggerError::io_operation(
                "list log directory",
                format!("Failed to read '{}'", directory.display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                LoggerError::io_operation(
                    "list log directory",
                    format!("Failed to read entry in '{}'", directory.display()),
                    e,
                )
            })?;

            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !self.is_backup(&name) {
                continue;
            }

            let path = entry.path();
            let created = self.backup_time(&path);
            backups.push(Backup {
                path,
                name,
                created,
            });
        }
        Ok(backups)
    }

    /// Delete the oldest backups so that at most `limit` remain
    ///
    /// Only files ending with the backup suffix are considered. A missing
    /// directory is treated as empty. Each deletion is attempted on its own;
    /// failures are logged and reported without stopping the pass.
    ///
    /// # Errors
    ///
    /// Returns error if the directory exists but cannot be listed
    pub fn enforce(&self, directory: &Path, limit: usize) -> Result<RetentionReport> {
        self.enforce_with(directory, limit, |path| fs::remove_file(path))
    }

    pub(crate) fn enforce_with<F>(
        &self,
        directory: &Path,
        limit: usize,
        mut remove: F,
    ) -> Result<RetentionReport>
    where
        F: FnMut(&Path) -> io::Result<()>,
    {
        if !directory.exists() {
            return Ok(RetentionReport::default());
        }

        let mut backups = self.list_backups(directory)?;
        backups.sort_by(newest_first);

        let mut report = RetentionReport::default();
        let expired = backups.split_off(limit.min(backups.len()));
        report.retained = backups.into_iter().map(|b| b.path).collect();

        for backup in expired {
            match remove(&backup.path) {
                Ok(()) => {
                    tracing::debug!(file = %backup.path.display(), "deleted expired backup");
                    report.deleted.push(backup.path);
                }
                Err(e) => {
                    tracing::warn!(
                        file = %backup.path.display(),
                        error = %e,
                        "failed to delete expired backup"
                    );
                    report.failed.push(backup.path);
                }
            }
        }

        Ok(report)
    }

    /// The most recently created backup in `directory`
    ///
    /// Backups whose time cannot be determined are never reported.
    ///
    /// # Errors
    ///
    /// Returns error if the directory exists but cannot be listed
    pub fn latest_backup(&self, directory: &Path) -> Result<Option<PathBuf>> {
        if !directory.exists() {
            return Ok(None);
        }

        let backups = self.list_backups(directory)?;
        Ok(backups
            .into_iter()
            .filter(|b| b.created.is_some())
            .min_by(newest_first)
            .map(|b| b.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap();
        path
    }

    fn touch_with_mtime(dir: &Path, name: &str, secs_ago: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(secs_ago))
            .unwrap();
        path
    }

    fn manager() -> RetentionManager {
        RetentionManager::new(".bak", TimeZoneMode::Utc)
    }

    #[test]
    fn test_enforce_deletes_oldest_by_name_time() {
        let temp_dir = TempDir::new().unwrap();
        let t1 = touch(temp_dir.path(), "app-20250101-000000.000.bak");
        let t2 = touch(temp_dir.path(), "app-20250102-000000.000.bak");
        let t3 = touch(temp_dir.path(), "app-20250103-000000.000.bak");

        let report = manager().enforce(temp_dir.path(), 2).unwrap();

        assert_eq!(report.deleted, vec![t1.clone()]);
        assert_eq!(report.retained, vec![t3.clone(), t2.clone()]);
        assert!(!t1.exists());
        assert!(t2.exists());
        assert!(t3.exists());
    }

    #[test]
    fn test_name_time_wins_over_mtime() {
        let temp_dir = TempDir::new().unwrap();
        // Newest by name, but oldest on disk
        let newer = touch_with_mtime(temp_dir.path(), "app-20250301-000000.000.bak", 3600);
        let older = touch(temp_dir.path(), "app-20250201-000000.000.bak");

        let report = manager().enforce(temp_dir.path(), 1).unwrap();

        assert_eq!(report.deleted, vec![older]);
        assert!(newer.exists());
    }

    #[test]
    fn test_unparseable_names_fall_back_to_mtime() {
        let temp_dir = TempDir::new().unwrap();
        let oldest = touch_with_mtime(temp_dir.path(), "zzz.bak", 300);
        let middle = touch_with_mtime(temp_dir.path(), "mmm.bak", 200);
        let newest = touch_with_mtime(temp_dir.path(), "aaa.bak", 100);

        let report = manager().enforce(temp_dir.path(), 1).unwrap();

        assert_eq!(report.deleted.len(), 2);
        assert!(!oldest.exists());
        assert!(!middle.exists());
        assert!(newest.exists());
    }

    #[test]
    fn test_equal_times_break_ties_by_name() {
        let temp_dir = TempDir::new().unwrap();
        let a = touch(temp_dir.path(), "a-20250101-000000.000.bak");
        let b = touch(temp_dir.path(), "b-20250101-000000.000.bak");

        let report = manager().enforce(temp_dir.path(), 1).unwrap();

        assert_eq!(report.retained, vec![b]);
        assert_eq!(report.deleted, vec![a]);
    }

    #[test]
    fn test_under_limit_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "app-20250101-000000.000.bak");
        touch(temp_dir.path(), "app-20250102-000000.000.bak");

        let report = manager().enforce(temp_dir.path(), 2).unwrap();

        assert!(report.is_noop());
        assert_eq!(report.retained.len(), 2);
    }

    #[test]
    fn test_non_backups_are_never_deleted() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..5 {
            touch(temp_dir.path(), &format!("app-{}.log", i));
        }

        let report = manager().enforce(temp_dir.path(), 1).unwrap();

        assert!(report.is_noop());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 5);
    }

    #[test]
    fn test_zero_limit_deletes_every_backup() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "app-20250101-000000.000.bak");
        touch(temp_dir.path(), "app-20250102-000000.000.bak");
        let current = touch(temp_dir.path(), "app.log");

        let report = manager().enforce(temp_dir.path(), 0).unwrap();

        assert_eq!(report.deleted.len(), 2);
        assert!(report.retained.is_empty());
        assert!(current.exists());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(manager().enforce(&missing, 0).unwrap().is_noop());
        assert_eq!(manager().latest_backup(&missing).unwrap(), None);
    }

    #[test]
    fn test_custom_suffix() {
        let temp_dir = TempDir::new().unwrap();
        let bak = touch(temp_dir.path(), "app-20250101-000000.000.bak");
        let old = touch(temp_dir.path(), "app-20250101-000000.000.old");

        let retention = RetentionManager::new(".old", TimeZoneMode::Utc);
        let report = retention.enforce(temp_dir.path(), 0).unwrap();

        assert_eq!(report.deleted, vec![old]);
        assert!(bak.exists());
    }

    #[test]
    fn test_backup_time() {
        let temp_dir = TempDir::new().unwrap();
        let named = touch(temp_dir.path(), "app-20250108-103045.123.bak");
        let plain = touch(temp_dir.path(), "app.log");

        let at = manager().backup_time(&named).unwrap();
        assert_eq!(at.timestamp_millis(), 1_736_332_245_123);
        assert_eq!(manager().backup_time(&plain), None);
    }

    #[test]
    fn test_latest_backup() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(manager().latest_backup(temp_dir.path()).unwrap(), None);

        touch(temp_dir.path(), "app-20250101-000000.000.bak");
        let newest = touch(temp_dir.path(), "app-20250105-000000.000.bak");
        touch(temp_dir.path(), "app-20250103-000000.000.bak");
        touch(temp_dir.path(), "app.log");

        assert_eq!(
            manager().latest_backup(temp_dir.path()).unwrap(),
            Some(newest)
        );
    }

    #[test]
    fn test_failed_delete_does_not_stop_the_pass() {
        let temp_dir = TempDir::new().unwrap();
        let oldest = touch(temp_dir.path(), "app-20250101-000000.000.bak");
        let stuck = touch(temp_dir.path(), "app-20250102-000000.000.bak");
        let newest = touch(temp_dir.path(), "app-20250103-000000.000.bak");

        let report = manager()
            .enforce_with(temp_dir.path(), 1, |path| {
                if path == stuck.as_path() {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
                } else {
                    fs::remove_file(path)
                }
            })
            .unwrap();

        // The stuck backup is tried first; the older one is still removed
        assert_eq!(report.failed, vec![stuck.clone()]);
        assert_eq!(report.deleted, vec![oldest.clone()]);
        assert_eq!(report.retained, vec![newest.clone()]);
        assert!(!report.is_noop());
        assert!(stuck.exists());
        assert!(!oldest.exists());
        assert!(newest.exists());
    }

    #[test]
    fn test_directories_are_not_backups() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("app-20250101-000000.000.bak")).unwrap();

        assert!(manager().enforce(temp_dir.path(), 0).unwrap().is_noop());
        assert_eq!(manager().latest_backup(temp_dir.path()).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_undated_backup_is_never_latest() {
        let temp_dir = TempDir::new().unwrap();
        // No time token and no readable metadata
        let dangling = temp_dir.path().join("dangling.bak");
        std::os::unix::fs::symlink(temp_dir.path().join("gone"), &dangling).unwrap();

        assert_eq!(manager().backup_time(&dangling), None);
        assert_eq!(manager().latest_backup(temp_dir.path()).unwrap(), None);

        let dated = touch(temp_dir.path(), "app-20250101-000000.000.bak");
        assert_eq!(
            manager().latest_backup(temp_dir.path()).unwrap(),
            Some(dated.clone())
        );

        // Still counted by retention, as the oldest
        let report = manager().enforce(temp_dir.path(), 1).unwrap();
        assert_eq!(report.deleted, vec![dangling.clone()]);
        assert_eq!(report.retained, vec![dated]);
        assert!(fs::symlink_metadata(&dangling).is_err());
    }
}
