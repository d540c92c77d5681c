//! Core writer types

pub mod config;
pub mod error;
pub mod log_writer;
pub mod metrics;
pub mod timestamp;

pub use config::{
    WriterConfig, DEBUG_RETENTION_LIMIT, DEFAULT_BACKUP_SUFFIX, DEFAULT_BUFFER_SIZE,
    DEFAULT_FLUSH_INTERVAL, DEFAULT_MAX_FILE_SIZE, DEFAULT_RETENTION_LIMIT, MIB,
};
pub use error::{LoggerError, Result};
pub use log_writer::{LogWriter, PathInfo};
pub use metrics::WriterMetrics;
pub use timestamp::{
    backup_file_name, format_log_time, parse_backup_timestamp, TimeZoneMode,
};
