//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::Path;

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a tradedesk command isolated from the caller's environment
pub fn tradedesk() -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("tradedesk"));
    cmd.env_remove("TRADEDESK_DATA")
        .env_remove("TRADEDESK_OUTBOX")
        .env_remove("TRADEDESK_PAGE_SIZE")
        .env_remove("TRADEDESK_REORDER_POLICY")
        .env_remove("RUST_LOG")
        .env("TRADEDESK_AUTHOR", "tester")
        .env("XDG_CONFIG_HOME", "/nonexistent/tradedesk-tests");
    cmd
}

/// Helper to create a project with the sample dataset in a temp directory
pub fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tradedesk().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Run a command in the project and return its stdout
pub fn stdout_of(tmp: &TempDir, args: &[&str]) -> String {
    let output = tradedesk().current_dir(tmp.path()).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Ids printed one per line by `--output id`
pub fn ids_of(tmp: &TempDir, args: &[&str]) -> Vec<u32> {
    let mut full = args.to_vec();
    full.extend(["--output", "id"]);
    stdout_of(tmp, &full)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim().parse().unwrap())
        .collect()
}

/// Files in a directory, sorted by name
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
