//! End-to-end runs of the hull binary.
//!
//! The `GIT` environment variable points at a stub executable so no real
//! repository or network is involved; `--noop` makes the resulting command
//! chain observable on stdout.

#![cfg(unix)]

use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A git stub that fails every query: no repository, no configuration.
fn silent_stub(dir: &TempDir) -> PathBuf {
    write_stub(dir, "#!/bin/sh\nexit 1\n")
}

/// A git stub that echoes its invocation, for exec passthrough checks.
fn echoing_stub(dir: &TempDir) -> PathBuf {
    write_stub(dir, "#!/bin/sh\necho \"stub-git $@\"\n")
}

fn write_stub(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("git");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    let mut perms = file.metadata().unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn hull(stub: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("hull").unwrap();
    cmd.env("GIT", stub)
        .env_remove("GITHUB_USER")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_HOST");
    cmd
}

#[test]
fn unknown_commands_pass_through_to_git() {
    let dir = TempDir::new().unwrap();
    let stub = echoing_stub(&dir);
    hull(&stub)
        .args(["frobnicate", "--level=9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stub-git frobnicate --level=9"));
}

#[test]
fn noop_prints_the_command_instead_of_running_it() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["--noop", "status", "-sb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("status -sb"));
}

#[test]
fn clone_shorthand_expands_to_a_clone_url() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["--noop", "clone", "schacon/ticgit"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "clone git://github.com/schacon/ticgit.git",
        ));
}

#[test]
fn clone_p_selects_ssh_transport() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["--noop", "clone", "-p", "schacon/ticgit"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "clone git@github.com:schacon/ticgit.git",
        ));
}

#[test]
fn a_config_override_reaches_in_process_resolution() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["-c", "hull.protocol=https", "--noop", "clone", "schacon/ticgit"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "clone https://github.com/schacon/ticgit.git",
        ));
}

#[test]
fn push_expands_a_comma_separated_remote_list() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    let assert = hull(&stub)
        .args(["--noop", "push", "origin,staging,qa", "mybranch"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("push origin mybranch"));
    assert!(stdout.contains("push staging mybranch"));
    assert!(stdout.contains("push qa mybranch"));
    assert_eq!(stdout.lines().count(), 3);
}

#[test]
fn version_chains_hulls_own_line() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["--noop", "--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("echo 'hull version'"));
}

#[test]
fn alias_prints_shell_text() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["alias", "-s", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alias git=hull"));
}

#[test]
fn alias_rejects_unknown_shells() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["alias", "powershell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("never heard of"));
}

#[test]
fn bare_invocations_print_help() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("usage: git"));
}

#[test]
fn repo_dependent_rules_fail_cleanly_outside_a_repository() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    hull(&stub)
        .args(["pull-request", "some title"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn the_exec_passthrough_propagates_exit_codes() {
    let dir = TempDir::new().unwrap();
    let stub = silent_stub(&dir);
    // The stub exits 1 for every invocation, including the final exec.
    hull(&stub).args(["status"]).assert().code(1);
}
