//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    let output = t.bare_cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "vaultview");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_no_store_configured() {
    let t = Test::new();

    t.bare_cmd()
        .arg("engines")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no secret store configured"));
}

#[test]
fn test_missing_store_file() {
    let t = Test::new();

    t.bare_cmd()
        .args(["--store", "does-not-exist.toml", "engines"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("io error"));
}

#[test]
fn test_invalid_store_file() {
    let t = Test::with_store(BROKEN_STORE);

    t.cmd()
        .arg("engines")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid store file"))
        .stderr(predicate::str::contains("invalid path 'app/'"));
}

#[test]
fn test_unknown_engine() {
    let t = Test::sample();

    t.cmd()
        .args(["ls", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown engine 'nope'"));
}

#[test]
fn test_unknown_directory() {
    let t = Test::sample();

    let output = t.ls("kv", "missing/");
    assert_failure(&output);
    assert_stderr_contains(&output, "'missing/' is not in the listing");
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::sample();

    let output = t.cmd().args(["--verbose", "engines"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "kv");
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.bare_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultview"));
}
