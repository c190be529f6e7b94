//! Tests for `engines` and `ls`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_engines_in_store_order() {
    let t = Test::sample();

    let output = t.engines();
    assert_success(&output);
    assert_eq!(stdout(&output), "scratch\nkv\nteam\n");
}

#[test]
fn test_engines_of_empty_store() {
    let t = Test::new();

    t.cmd()
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("no engines"));
}

#[test]
fn test_ls_engine_root() {
    let t = Test::sample();

    let output = t.ls("kv", "");
    assert_success(&output);
    assert_eq!(stdout(&output), "app/\ninfra/\n");
}

#[test]
fn test_ls_nested_directory() {
    let t = Test::sample();

    let output = t.ls("kv", "app/");
    assert_success(&output);
    assert_eq!(stdout(&output), "db/\napi\n");

    let output = t.ls("kv", "app/db/");
    assert_success(&output);
    assert_eq!(stdout(&output), "creds\n");
}

#[test]
fn test_ls_accepts_path_without_trailing_slash() {
    let t = Test::sample();

    let output = t.ls("kv", "app/db");
    assert_success(&output);
    assert_stdout_contains(&output, "creds");
}

#[test]
fn test_ls_empty_engine() {
    let t = Test::sample();

    t.cmd()
        .args(["ls", "scratch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(empty)"));
}
