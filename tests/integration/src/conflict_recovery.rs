//! Conflict preservation against real divergent histories.

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use sync_core::{NetworkSection, SyncConfig, SyncEngine};
use sync_git::GitCommandGateway;
use sync_test_utils::git::{clone_pair, git};
use tempfile::TempDir;

/// Keeps the listener alive so the probe endpoint stays reachable.
struct Online(#[allow(dead_code)] TcpListener);

fn online_config() -> (SyncConfig, Online) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = SyncConfig {
        network: NetworkSection {
            probe_host: "127.0.0.1".to_string(),
            probe_port: port,
            timeout_secs: 1,
        },
        ..SyncConfig::default()
    };
    (config, Online(listener))
}

fn engine(root: &Path, config: SyncConfig) -> SyncEngine<GitCommandGateway> {
    SyncEngine::new(root, config, GitCommandGateway::new(root))
}

/// Both machines edited `seed.txt`; machine A published first. Machine B's
/// run must preserve both versions verbatim, leave the tree clean, and
/// still finish the pass.
#[test]
fn scenario_c_divergent_edit_preserves_both_versions() {
    let temp = TempDir::new().unwrap();
    let (_origin, clone_a, clone_b) = clone_pair(temp.path());
    let (config, _online) = online_config();

    // A publishes its version
    fs::write(clone_a.join("seed.txt"), "version from a").unwrap();
    git(&clone_a, &["commit", "-am", "a edit"]);
    git(&clone_a, &["push", "origin", "master"]);

    // B committed its own version on an earlier (offline) run
    fs::write(clone_b.join("seed.txt"), "version from b").unwrap();
    git(&clone_b, &["commit", "-am", "b edit"]);

    let report = engine(&clone_b, config).run().unwrap();

    // Both sides were materialized, byte for byte
    assert_eq!(
        fs::read_to_string(clone_b.join("LOCAL_seed.txt")).unwrap(),
        "version from b"
    );
    assert_eq!(
        fs::read_to_string(clone_b.join("REMOTE_seed.txt")).unwrap(),
        "version from a"
    );
    assert!(report.conflicts.contains(&"seed.txt".to_string()));

    // The merge was abandoned: the tree is back in a clean state
    let repo = git2::Repository::open(&clone_b).unwrap();
    assert_eq!(repo.state(), git2::RepositoryState::Clean);

    // The original file still holds B's content after the abort
    assert_eq!(
        fs::read_to_string(clone_b.join("seed.txt")).unwrap(),
        "version from b"
    );

    // The artifacts themselves are new files, picked up and recorded
    let store = fs::read_to_string(clone_b.join(".file_hashes.txt")).unwrap();
    assert!(store.contains("LOCAL_seed.txt||"));
    assert!(store.contains("REMOTE_seed.txt||"));
}

/// Re-running the same failed sync overwrites the previous artifacts
/// instead of accumulating snapshots.
#[test]
fn repeated_conflict_runs_do_not_accumulate_artifacts() {
    let temp = TempDir::new().unwrap();
    let (_origin, clone_a, clone_b) = clone_pair(temp.path());
    let (config, _online) = online_config();

    fs::write(clone_a.join("seed.txt"), "version from a").unwrap();
    git(&clone_a, &["commit", "-am", "a edit"]);
    git(&clone_a, &["push", "origin", "master"]);

    fs::write(clone_b.join("seed.txt"), "version from b").unwrap();
    git(&clone_b, &["commit", "-am", "b edit"]);

    engine(&clone_b, config.clone()).run().unwrap();
    engine(&clone_b, config).run().unwrap();

    let artifacts: Vec<String> = fs::read_dir(&clone_b)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("LOCAL_") || name.starts_with("REMOTE_"))
        .collect();

    assert_eq!(artifacts.len(), 2, "exactly one artifact pair: {artifacts:?}");
    assert_eq!(
        fs::read_to_string(clone_b.join("REMOTE_seed.txt")).unwrap(),
        "version from a"
    );
}

/// Custom marker prefixes from the configuration are honored.
#[test]
fn configured_prefixes_name_the_artifacts() {
    let temp = TempDir::new().unwrap();
    let (_origin, clone_a, clone_b) = clone_pair(temp.path());
    let (mut config, _online) = online_config();
    config.local_prefix = "MINE_".to_string();
    config.remote_prefix = "THEIRS_".to_string();

    fs::write(clone_a.join("seed.txt"), "version from a").unwrap();
    git(&clone_a, &["commit", "-am", "a edit"]);
    git(&clone_a, &["push", "origin", "master"]);

    fs::write(clone_b.join("seed.txt"), "version from b").unwrap();
    git(&clone_b, &["commit", "-am", "b edit"]);

    engine(&clone_b, config).run().unwrap();

    assert!(clone_b.join("MINE_seed.txt").exists());
    assert!(clone_b.join("THEIRS_seed.txt").exists());
    assert!(!clone_b.join("LOCAL_seed.txt").exists());
}
