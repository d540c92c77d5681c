//! Timestamp formatting utilities
//!
//! Renders the fixed-width time prefix of every log line and reads the
//! creation time that rotated backups carry in their file names. All
//! functions here are pure, so they can be called from any thread without
//! shared scratch state.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pattern of the time prefix on each line: `2025-01-08 10:30:45.123`
pub const LOG_TIME_PATTERN: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Pattern of the token embedded in backup names: `-20250108-103045.123`
pub const BACKUP_TIME_PATTERN: &str = "-%Y%m%d-%H%M%S%.3f";

/// Length in bytes of a backup time token (`-DDDDDDDD-DDDDDD.DDD`)
const BACKUP_TOKEN_LEN: usize = 20;

/// Time zone used to render line prefixes and to read backup tokens
///
/// # Examples
///
/// ```
/// use rust_file_logger::core::TimeZoneMode;
///
/// assert_eq!(TimeZoneMode::default(), TimeZoneMode::Local);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZoneMode {
    /// The host's local time zone
    #[default]
    Local,

    /// Coordinated Universal Time
    Utc,
}

impl TimeZoneMode {
    /// Render `at` in this zone with a strftime pattern
    #[must_use]
    pub fn render(self, at: &DateTime<chrono::Utc>, pattern: &str) -> String {
        match self {
            TimeZoneMode::Local => at.with_timezone(&chrono::Local).format(pattern).to_string(),
            TimeZoneMode::Utc => at.format(pattern).to_string(),
        }
    }

    /// Interpret a wall-clock time as belonging to this zone
    ///
    /// Returns `None` for local times that do not exist (DST gaps). Ambiguous
    /// local times resolve to the earlier instant.
    #[must_use]
    pub fn resolve(self, naive: &NaiveDateTime) -> Option<DateTime<chrono::Utc>> {
        match self {
            TimeZoneMode::Local => chrono::Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&chrono::Utc)),
            TimeZoneMode::Utc => Some(chrono::Utc.from_utc_datetime(naive)),
        }
    }
}

/// Convert epoch milliseconds to a UTC instant, clamping unrepresentable
/// values to the epoch
#[must_use]
pub fn datetime_from_millis(timestamp_millis: i64) -> DateTime<chrono::Utc> {
    DateTime::<chrono::Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default()
}

/// Format epoch milliseconds as `yyyy-MM-dd HH:mm:ss.SSS`
///
/// # Examples
///
/// ```
/// use rust_file_logger::core::{format_log_time, TimeZoneMode};
///
/// let text = format_log_time(1_736_332_245_123, TimeZoneMode::Utc);
/// assert_eq!(text, "2025-01-08 10:30:45.123");
/// ```
#[must_use]
pub fn format_log_time(timestamp_millis: i64, zone: TimeZoneMode) -> String {
    zone.render(&datetime_from_millis(timestamp_millis), LOG_TIME_PATTERN)
}

/// Locate the first `-DDDDDDDD-DDDDDD.DDD` token in a file name
#[must_use]
pub fn find_backup_token(file_name: &str) -> Option<&str> {
    let bytes = file_name.as_bytes();
    if bytes.len() < BACKUP_TOKEN_LEN {
        return None;
    }

    (0..=bytes.len() - BACKUP_TOKEN_LEN)
        .find(|&start| is_backup_token(&bytes[start..start + BACKUP_TOKEN_LEN]))
        .map(|start| &file_name[start..start + BACKUP_TOKEN_LEN])
}

fn is_backup_token(window: &[u8]) -> bool {
    window.iter().enumerate().all(|(i, b)| match i {
        0 | 9 => *b == b'-',
        16 => *b == b'.',
        _ => b.is_ascii_digit(),
    })
}

/// Parse the creation time embedded in a backup file name
///
/// The first token matching `-yyyyMMdd-HHmmss.SSS` is read in `zone`.
/// Returns `None` when no token is present or its digits are not a valid
/// date and time; callers fall back to the file's modification time.
///
/// # Examples
///
/// ```
/// use rust_file_logger::core::{parse_backup_timestamp, TimeZoneMode};
///
/// let at = parse_backup_timestamp("app-20250108-103045.123.bak", TimeZoneMode::Utc).unwrap();
/// assert_eq!(at.timestamp_millis(), 1_736_332_245_123);
///
/// assert!(parse_backup_timestamp("app.bak", TimeZoneMode::Utc).is_none());
/// ```
#[must_use]
pub fn parse_backup_timestamp(file_name: &str, zone: TimeZoneMode) -> Option<DateTime<chrono::Utc>> {
    let token = find_backup_token(file_name)?;
    let field = |range: std::ops::Range<usize>| token[range].parse::<u32>().ok();

    let year = i32::try_from(field(1..5)?).ok()?;
    let naive = NaiveDate::from_ymd_opt(year, field(5..7)?, field(7..9)?)?.and_hms_milli_opt(
        field(10..12)?,
        field(12..14)?,
        field(14..16)?,
        field(17..20)?,
    )?;

    zone.resolve(&naive)
}

/// Build the backup name for an active file rotated at `at`
///
/// The final extension of `name` is replaced by the time token and `suffix`,
/// so `app.log` becomes `app-20250108-103045.123.bak`.
#[must_use]
pub fn backup_file_name(
    name: &str,
    at: &DateTime<chrono::Utc>,
    zone: TimeZoneMode,
    suffix: &str,
) -> String {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(name);

    format!("{}{}{}", stem, zone.render(at, BACKUP_TIME_PATTERN), suffix)
}
