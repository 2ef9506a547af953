//! Git repository fixtures at three realism levels.
//!
//! Choose the lowest-realism fixture that satisfies your test's needs —
//! fakes are faster and have fewer external dependencies.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run a git command in `path`, panicking on any failure.
///
/// Test-only helper; production code goes through the gateway.
///
/// # Panics
/// Panics if the command cannot be spawned or exits non-zero.
pub fn git(path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("git: failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "git: `git {args:?}` failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Creates a minimal `.git` directory structure **without** initialising a real
/// git repository.
///
/// Realism level: **FAKE** — directory structure only, no git object store.
///
/// Use for: tests that need a `.git` marker so the scanner prunes it, but do
/// not perform any real git operations.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn fake_git_dir(path: &Path) {
    fs::create_dir(path.join(".git"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create .git: {e}"));
    fs::write(path.join(".git/HEAD"), "ref: refs/heads/master\n")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write HEAD: {e}"));
    fs::create_dir_all(path.join(".git/refs/heads"))
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to create refs/heads: {e}"));
    fs::write(path.join(".git/refs/heads/master"), "")
        .unwrap_or_else(|e| panic!("fake_git_dir: failed to write refs/heads/master: {e}"));
}

/// Initialises a real git repository using `git2` (no initial commit, no config).
///
/// Realism level: **REAL** — valid git object store, empty history.
///
/// Use for: tests that need valid git state but no commit history.
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> git2::Repository {
    git2::Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Initialises a real git repository with an initial commit using the `git` CLI.
///
/// Realism level: **REAL WITH HISTORY** — valid git state, `master` branch,
/// one commit in history.
///
/// Specifically:
/// - Runs `git init`
/// - Configures `user.email`, `user.name`, and `commit.gpgsign = false`
/// - Creates `seed.txt` and makes an initial commit
/// - Renames the default branch to `master`
///
/// Use for: gateway tests that need real staging, commit, and revision state.
///
/// # Panics
/// Panics if any git operation fails.
pub fn real_git_repo_with_commit(path: &Path) {
    git(path, &["init"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);

    fs::write(path.join("seed.txt"), "seed")
        .unwrap_or_else(|e| panic!("real_git_repo_with_commit: failed to write seed.txt: {e}"));

    git(path, &["add", "."]);
    git(path, &["commit", "-m", "Initial commit"]);
    // Best-effort: older git versions may not support this flag
    let _ = Command::new("git")
        .args(["branch", "-m", "master"])
        .current_dir(path)
        .output();
}

/// Creates a bare origin plus two clones that both track `master`.
///
/// Realism level: **REAL WITH REMOTE** — the shape every divergence and
/// conflict scenario needs: two working copies sharing one upstream.
///
/// The first clone seeds `seed.txt`, commits, and pushes, then the second
/// clone pulls so both start from the same revision.
///
/// # Panics
/// Panics if any git operation fails.
pub fn clone_pair(base: &Path) -> (std::path::PathBuf, std::path::PathBuf, std::path::PathBuf) {
    let origin = base.join("origin.git");
    let clone_a = base.join("clone_a");
    let clone_b = base.join("clone_b");

    fs::create_dir_all(&origin).unwrap_or_else(|e| panic!("clone_pair: mkdir origin: {e}"));
    git(&origin, &["init", "--bare"]);
    git(&origin, &["symbolic-ref", "HEAD", "refs/heads/master"]);

    git(base, &["clone", "origin.git", "clone_a"]);
    git(base, &["clone", "origin.git", "clone_b"]);

    for clone in [&clone_a, &clone_b] {
        git(clone, &["config", "user.email", "test@test.com"]);
        git(clone, &["config", "user.name", "Test User"]);
        git(clone, &["config", "commit.gpgsign", "false"]);
        // Works whether the clone's unborn HEAD is master or main
        git(clone, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    }

    fs::write(clone_a.join("seed.txt"), "seed")
        .unwrap_or_else(|e| panic!("clone_pair: failed to write seed.txt: {e}"));
    git(&clone_a, &["add", "."]);
    git(&clone_a, &["commit", "-m", "Initial commit"]);
    git(&clone_a, &["push", "origin", "master"]);
    git(&clone_b, &["pull", "origin", "master"]);

    (origin, clone_a, clone_b)
}
