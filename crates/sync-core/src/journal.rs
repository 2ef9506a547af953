//! Append-only run journal
//!
//! One human-readable line per event, `[YYYY-MM-DD HH:MM:SS] <message>`,
//! written inside the synchronized root. The journal is a side channel:
//! it is never parsed back, and failing to write it never fails a run.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Timestamp layout shared by the journal and commit messages.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Record one event, mirrored to tracing.
    pub fn record(&self, message: &str) {
        tracing::info!("{message}");

        let line = format!("[{}] {message}\n", Local::now().format(TIMESTAMP_FORMAT));
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        if let Err(e) = result {
            tracing::warn!("journal write failed for {}: {e}", self.path.display());
        }
    }
}
