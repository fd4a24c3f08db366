#![allow(dead_code)]

//! Common test utilities: local git fixtures and directory layouts

use std::path::{Path, PathBuf};
use std::process::Command;

use orgmirror::RepoDescriptor;

/// Run one git command in `cwd`, panicking on failure
pub fn git(cwd: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        cwd.display(),
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Run one git command in `cwd` and return its trimmed stdout
pub fn git_stdout(cwd: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to run git");

    assert!(
        output.status.success(),
        "git {:?} failed in {}: {}",
        args,
        cwd.display(),
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create a clonable origin repository with one commit at `path`
pub fn create_origin(path: &Path) -> PathBuf {
    std::fs::create_dir_all(path).expect("Failed to create origin dir");
    git(path, &["init", "--quiet"]);
    git(path, &["config", "user.email", "tests@example.invalid"]);
    git(path, &["config", "user.name", "Test Fixture"]);
    std::fs::write(path.join("README.md"), "# fixture\n").expect("Failed to write file");
    git(path, &["add", "README.md"]);
    git(path, &["commit", "--quiet", "-m", "initial commit"]);
    path.to_path_buf()
}

/// Add a commit touching `file` to an existing origin
pub fn add_commit(origin: &Path, file: &str) {
    std::fs::write(origin.join(file), "update\n").expect("Failed to write file");
    git(origin, &["add", file]);
    git(origin, &["commit", "--quiet", "-m", "update"]);
}

/// Create the expected local layout: a root with private/ and public/
pub fn create_local_root(root: &Path) {
    std::fs::create_dir_all(root.join("private")).expect("Failed to create private/");
    std::fs::create_dir_all(root.join("public")).expect("Failed to create public/");
}

/// Descriptor builder with harmless defaults for syncer tests.
///
/// The syncer never validates URLs, so tests point them at local paths.
pub fn descriptor(name: &str) -> RepoDescriptor {
    RepoDescriptor {
        name: name.to_string(),
        private: false,
        has_wiki: false,
        ssh_url: "/nonexistent/ssh".to_string(),
        clone_url: "/nonexistent/https".to_string(),
        parent_url: String::new(),
    }
}
