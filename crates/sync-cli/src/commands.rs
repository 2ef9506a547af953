//! Command implementations

use crate::error::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use sync_core::{SyncConfig, SyncEngine, detect_dirty};
use sync_fs::FingerprintStore;
use sync_git::GitCommandGateway;

/// Resolve the effective root and its configuration.
///
/// Configuration is discovered where the command starts, the root is
/// resolved from it, and when the configured root points elsewhere the
/// configuration is re-read from there so per-root settings win.
fn resolve(root_override: Option<&Path>) -> Result<(PathBuf, SyncConfig)> {
    let base = match root_override {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let config = SyncConfig::discover(&base)?;
    let root = config.resolve_root(root_override)?;

    let config = if root != base {
        SyncConfig::discover(&root)?
    } else {
        config
    };
    Ok((root, config))
}

/// Execute one full sync pass and print the outcome.
pub fn run_sync(root_override: Option<&Path>) -> Result<()> {
    let (root, config) = resolve(root_override)?;
    let gateway = GitCommandGateway::new(&root);
    let engine = SyncEngine::new(&root, config, gateway);

    let report = engine.run()?;

    if !report.changed {
        println!("{} {} is up to date", "sync".green().bold(), root.display());
        return Ok(());
    }

    println!(
        "{} staged {} file(s) in {}",
        "sync".green().bold(),
        report.staged.len(),
        root.display()
    );
    for path in &report.staged {
        println!("  {} {path}", "staged".cyan());
    }
    for path in &report.conflicts {
        println!("  {} {path}", "conflict".yellow().bold());
    }
    for artifact in &report.preserved {
        println!("  {} {artifact}", "preserved".yellow());
    }
    for error in &report.errors {
        println!("  {} {error}", "warning".red());
    }

    let publish_state = if report.pushed {
        "committed and pushed".to_string()
    } else if report.committed {
        "committed locally; push deferred to the next run".to_string()
    } else {
        "commit did not complete; see the sync log".to_string()
    };
    println!("{} {publish_state}", "sync".green().bold());

    Ok(())
}

/// Show what the next run would stage, without touching the backend.
pub fn run_status(root_override: Option<&Path>) -> Result<()> {
    let (root, config) = resolve(root_override)?;

    let store = FingerprintStore::new(root.join(&config.store_file));
    let previous = store.load()?;
    let exclude = [config.store_file.as_str(), config.log_file.as_str()];
    let dirty = detect_dirty(&root, &previous, &exclude);

    if dirty.is_empty() {
        println!("{} {} is clean", "status".green().bold(), root.display());
    } else {
        println!(
            "{} {} file(s) would be staged:",
            "status".yellow().bold(),
            dirty.len()
        );
        for (path, _) in &dirty {
            println!("  {path}");
        }
    }
    Ok(())
}
