//! Filesystem side of the writer: the active file and backup retention

pub mod file_state;
pub mod retention;

pub use file_state::{ActiveFile, FileState};
pub use retention::{RetentionManager, RetentionReport};
