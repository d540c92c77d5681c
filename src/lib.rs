//! # Rust File Logger
//!
//! A thread-safe, size-bounded log file writer with dated backups and
//! count-based retention.
//!
//! ## Features
//!
//! - **Buffered Appends**: One formatted line per write, flushed on an interval
//! - **Size Threshold**: Reports when the active file needs rotating
//! - **Dated Backups**: Rotated files carry their creation time in the name
//! - **Bounded Retention**: Oldest backups beyond a count are deleted
//! - **Thread Safe**: All file access is serialized by a single lock

pub mod core;
pub mod storage;

pub mod prelude {
    pub use crate::core::{
        format_log_time, parse_backup_timestamp, LogWriter, LoggerError, PathInfo, Result,
        TimeZoneMode, WriterConfig, WriterMetrics,
    };
    pub use crate::storage::RetentionReport;
}

pub use crate::core::{
    backup_file_name, format_log_time, parse_backup_timestamp, LogWriter, LoggerError, PathInfo,
    Result, TimeZoneMode, WriterConfig, WriterMetrics,
};
pub use crate::storage::{RetentionManager, RetentionReport};
