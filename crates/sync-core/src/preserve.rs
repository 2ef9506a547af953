//! Conflict preservation
//!
//! When the backend cannot merge automatically, both competing versions of
//! every conflicted file are materialized side by side under marker-prefixed
//! names, so no edit is lost when the merge is abandoned. The caller is
//! responsible for invoking the matching abort afterwards.

use crate::config::SyncConfig;
use crate::journal::Journal;
use std::fs;
use std::path::Path;
use sync_fs::SlashPath;
use sync_git::VcsGateway;

/// Writes the local and remote versions of conflicted files next to the
/// originals.
pub struct ConflictPreserver<'a, G: VcsGateway> {
    gateway: &'a G,
    config: &'a SyncConfig,
    root: &'a Path,
    journal: &'a Journal,
}

impl<'a, G: VcsGateway> ConflictPreserver<'a, G> {
    pub fn new(
        gateway: &'a G,
        config: &'a SyncConfig,
        root: &'a Path,
        journal: &'a Journal,
    ) -> Self {
        Self {
            gateway,
            config,
            root,
            journal,
        }
    }

    /// Preserve both sides of every path in the conflict set.
    ///
    /// Each write is attempted independently: a missing revision or a
    /// failed write is journaled and does not stop the remaining files.
    /// Re-running overwrites earlier artifacts of the same name, so
    /// repeated failed syncs do not accumulate snapshots.
    ///
    /// Returns the root-relative paths of the artifacts written.
    pub fn preserve(&self, conflicted: &[String]) -> Vec<String> {
        let mut preserved = Vec::new();
        let remote_rev = format!("origin/{}", self.config.branch);

        for path in conflicted {
            if let Some(artifact) = self.preserve_side(path, "HEAD", &self.config.local_prefix) {
                self.journal.record(&format!("Preserved local version: {artifact}"));
                preserved.push(artifact);
            }
            if let Some(artifact) =
                self.preserve_side(path, &remote_rev, &self.config.remote_prefix)
            {
                self.journal.record(&format!("Preserved remote version: {artifact}"));
                preserved.push(artifact);
            }
        }
        preserved
    }

    /// Write one side of one conflicted file; `None` means journaled failure.
    fn preserve_side(&self, path: &str, rev: &str, prefix: &str) -> Option<String> {
        let rel = SlashPath::from(path);
        let Some(base_name) = rel.file_name() else {
            self.journal
                .record(&format!("Cannot preserve {path}: no file name"));
            return None;
        };

        let marked = format!("{prefix}{base_name}");
        let artifact = match rel.parent() {
            Some(dir) => dir.join(&marked),
            None => SlashPath::from(marked.as_str()),
        };

        let content = match self.gateway.show_revision(rev, path) {
            Ok(content) => content,
            Err(e) => {
                self.journal
                    .record(&format!("Could not read {rev} version of {path}: {e}"));
                return None;
            }
        };

        let target = self.root.join(artifact.to_native());
        if let Err(e) = fs::write(&target, content) {
            self.journal
                .record(&format!("Could not write {artifact}: {e}"));
            return None;
        }
        Some(artifact.as_str().to_string())
    }
}
