//! Rotation example
//!
//! Writes lines until the active file is full, rotates it to a dated backup
//! and lets retention keep the newest three.
//!
//! Run with: cargo run --example basic_rotation

use rust_file_logger::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust File Logger - Rotation Example ===\n");

    let directory = std::env::temp_dir().join("rust_file_logger_demo");
    let config = WriterConfig::new()
        .with_max_file_size(2 * 1024)
        .with_flush_interval(Duration::from_millis(500))
        .with_retention_limit(3);

    let writer = LogWriter::with_config(config)?;
    writer.try_initialize(&directory)?;
    writer.ready("demo.log")?;

    for i in 1..=200 {
        let now = chrono::Utc::now().timestamp_millis();
        writer.write(&format!("processing item {}/200", i), now, false)?;

        if writer.is_size_limited() {
            let backup = writer.rotate()?;
            println!("rotated to {}", backup.display());
            // Backup names carry millisecond timestamps
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    writer.write("all items processed", chrono::Utc::now().timestamp_millis(), true)?;

    let paths = writer.resolve_paths("demo.log")?;
    println!("\ncurrent file:  {}", paths.current_file.display());
    if let Some(latest) = paths.latest_backup {
        println!("latest backup: {}", latest.display());
    }

    let metrics = writer.metrics();
    println!(
        "\n{} lines, {} rotations, {} backups deleted",
        metrics.lines_written(),
        metrics.rotations(),
        metrics.backups_deleted()
    );

    Ok(())
}
