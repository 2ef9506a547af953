//! Sync orchestration for folder-sync
//!
//! Drives one unattended sync pass: integrate remote changes, detect local
//! edits by content fingerprint, commit, publish, and persist detection
//! state — preserving both sides of any conflict the backend cannot merge
//! automatically.

pub mod config;
pub mod engine;
pub mod error;
pub mod journal;
pub mod net;
pub mod preserve;

pub use config::{NetworkSection, SyncConfig};
pub use engine::{SyncEngine, SyncReport, detect_dirty};
pub use error::{Error, Result};
pub use journal::Journal;
pub use preserve::ConflictPreserver;
