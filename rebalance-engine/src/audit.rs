use crate::models::{OrderRecord, Side};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Append-only audit of every order attempt, one JSON line per call, one
/// stream per order side. Append is the only operation; there is no read,
/// update, or compaction path.
pub struct OrderLogger {
    log_dir: PathBuf,
}

impl OrderLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn stream_path(&self, side: Side) -> PathBuf {
        self.log_dir.join(format!("{}_orders.log", side.as_str()))
    }

    /// Appends one complete serialized record to the stream for `side`,
    /// creating the directory and file on first use.
    pub fn record(&self, side: Side, order: &OrderRecord) -> std::io::Result<()> {
        fs::create_dir_all(&self.log_dir)?;
        let line = serde_json::to_string(order)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.stream_path(side))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}
