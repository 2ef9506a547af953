//! The sync state machine
//!
//! One run: integrate remote changes, detect and stage local edits, commit,
//! rebase-and-push, persist fingerprints. Conflicts at the integrate or
//! publish step route through the preserver and the run continues as if the
//! step had been a no-op. Everything recoverable is journaled, not raised;
//! the only fatal conditions are a corrupt fingerprint store, a failed
//! store write, and an unusable proxy configuration.

use crate::Result;
use crate::config::SyncConfig;
use crate::journal::{Journal, TIMESTAMP_FORMAT};
use crate::net;
use crate::preserve::ConflictPreserver;
use chrono::Local;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use sync_fs::{FingerprintStore, file_digest, scan};
use sync_git::{ProxyKind, VcsGateway};

/// What one sync run did, for CLI rendering and tests.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// True iff at least one file was staged this run
    pub changed: bool,
    /// True iff the local commit was created
    pub committed: bool,
    /// True iff the publish step pushed successfully
    pub pushed: bool,
    /// Relative paths staged this run
    pub staged: Vec<String>,
    /// Relative paths the backend reported as conflicted
    pub conflicts: Vec<String>,
    /// Conflict artifacts written (marker-prefixed copies)
    pub preserved: Vec<String>,
    /// Recoverable failures, already journaled
    pub errors: Vec<String>,
}

/// Paths whose current digest differs from the recorded one.
///
/// A path is dirty when it is absent from `previous` or its digest
/// changed. Paths named in `exclude` (the tool's own bookkeeping files)
/// and paths that cannot be opened are skipped.
pub fn detect_dirty(
    root: &Path,
    previous: &BTreeMap<String, String>,
    exclude: &[&str],
) -> Vec<(String, String)> {
    let mut dirty = Vec::new();
    for rel in scan(root) {
        if exclude.contains(&rel.as_str()) {
            continue;
        }
        let digest = match file_digest(&root.join(&rel)) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::debug!("skipping unreadable file {rel}: {e}");
                continue;
            }
        };
        if previous.get(&rel) != Some(&digest) {
            dirty.push((rel, digest));
        }
    }
    dirty
}

/// Orchestrates one sync pass over a synchronized root.
pub struct SyncEngine<G: VcsGateway> {
    root: PathBuf,
    config: SyncConfig,
    gateway: G,
    journal: Journal,
}

impl<G: VcsGateway> SyncEngine<G> {
    pub fn new(root: impl Into<PathBuf>, config: SyncConfig, gateway: G) -> Self {
        let root = root.into();
        let journal = Journal::new(root.join(&config.log_file));
        Self {
            root,
            config,
            gateway,
            journal,
        }
    }

    /// Execute one full sync pass.
    ///
    /// # Errors
    ///
    /// Returns an error only when continuing could corrupt detection state:
    /// a corrupt or unwritable fingerprint store, or a proxy configuration
    /// the backend rejects. Every other failure is journaled and the run
    /// proceeds.
    pub fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        self.apply_proxies()?;

        let store = FingerprintStore::new(self.root.join(&self.config.store_file));
        let previous = store.load()?;
        let mut new_hashes = previous.clone();

        if net::reachable(&self.config.network) {
            self.integrate(&mut report);
        } else {
            self.journal.record("Network unreachable: pull skipped.");
        }

        let exclude = [self.config.store_file.as_str(), self.config.log_file.as_str()];
        for (rel, digest) in detect_dirty(&self.root, &previous, &exclude) {
            match self.gateway.stage(&rel) {
                Ok(()) => {
                    self.journal.record(&format!("File changed or new: {rel}"));
                    new_hashes.insert(rel.clone(), digest);
                    report.staged.push(rel);
                }
                Err(e) => {
                    let message = format!("Failed to stage {rel}: {e}");
                    self.journal.record(&message);
                    report.errors.push(message);
                }
            }
        }
        report.changed = !report.staged.is_empty();

        if !report.changed {
            self.journal.record("No new changes to commit.");
            return Ok(report);
        }

        match self.gateway.commit(&commit_message()) {
            Ok(output) if output.success() => {
                self.journal.record("Committed changes locally.");
                report.committed = true;
            }
            // Expected when staged content already matches the tree;
            // indistinguishable from a real commit error at this layer
            Ok(output) => {
                self.journal
                    .record(&format!("Commit failed: {}", output.combined().trim()));
            }
            Err(e) => self.journal.record(&format!("Commit failed: {e}")),
        }

        if net::reachable(&self.config.network) {
            self.publish(&mut report);
        } else {
            self.journal.record("Network unreachable: push skipped.");
        }

        // Persisted regardless of publish outcome, so the next run does not
        // re-detect already-committed files
        store.save(&new_hashes)?;
        Ok(report)
    }

    fn apply_proxies(&self) -> Result<()> {
        if let Some(url) = self.config.http_proxy.as_deref()
            && !url.is_empty()
        {
            self.gateway.set_proxy(ProxyKind::Http, url)?;
        }
        if let Some(url) = self.config.https_proxy.as_deref()
            && !url.is_empty()
        {
            self.gateway.set_proxy(ProxyKind::Https, url)?;
        }
        Ok(())
    }

    fn integrate(&self, report: &mut SyncReport) {
        match self.gateway.fetch_and_merge(&self.config.branch) {
            Ok(outcome) if outcome.succeeded => {
                self.journal.record("Pulled latest changes from origin.");
            }
            Ok(outcome) if outcome.had_conflicts => {
                self.journal
                    .record("Conflicts detected during pull; preserving both versions.");
                self.recover_conflicts(report);
                if let Err(e) = self.gateway.abort_merge() {
                    self.journal.record(&format!("Failed to abort merge: {e}"));
                }
            }
            Ok(outcome) => {
                self.journal.record(&format!("Pull failed: {}", outcome.detail));
            }
            Err(e) => self.journal.record(&format!("Pull failed: {e}")),
        }
    }

    fn publish(&self, report: &mut SyncReport) {
        match self.gateway.rebase(&self.config.branch) {
            Ok(outcome) if outcome.succeeded => {
                match self.gateway.push(&self.config.branch) {
                    Ok(()) => {
                        self.journal.record("Pushed changes to origin.");
                        report.pushed = true;
                    }
                    Err(e) => {
                        let message = format!("Failed to push changes: {e}");
                        self.journal.record(&message);
                        report.errors.push(message);
                    }
                }
            }
            Ok(outcome) if outcome.had_conflicts => {
                self.journal
                    .record("Conflicts detected during rebase; preserving both versions.");
                self.recover_conflicts(report);
                if let Err(e) = self.gateway.abort_rebase() {
                    self.journal.record(&format!("Failed to abort rebase: {e}"));
                }
            }
            Ok(outcome) => {
                self.journal.record(&format!("Rebase failed: {}", outcome.detail));
            }
            Err(e) => self.journal.record(&format!("Rebase failed: {e}")),
        }
    }

    fn recover_conflicts(&self, report: &mut SyncReport) {
        let conflicted = match self.gateway.conflicted_paths() {
            Ok(paths) => paths,
            Err(e) => {
                self.journal
                    .record(&format!("Could not list conflicted paths: {e}"));
                return;
            }
        };

        let preserver =
            ConflictPreserver::new(&self.gateway, &self.config, &self.root, &self.journal);
        report.preserved.extend(preserver.preserve(&conflicted));
        report.conflicts.extend(conflicted);
    }
}

/// Commit message identifying the originating host and time.
fn commit_message() -> String {
    let host = whoami::fallible::hostname().unwrap_or_else(|_| "unknown".into());
    format!("Auto-sync [{host} {}]", Local::now().format(TIMESTAMP_FORMAT))
}
