//! Tests for `show` and `set`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_show_masks_values() {
    let t = Test::sample();

    let output = t.show("kv", "app/db/creds");
    assert_success(&output);
    assert_stdout_contains(&output, "creds");
    assert_stdout_contains(&output, "username");
    assert_stdout_contains(&output, "*****");
    assert_stdout_excludes(&output, "hunter2");
}

#[test]
fn test_show_reveal() {
    let t = Test::sample();

    let output = t.reveal("kv", "app/db/creds");
    assert_success(&output);
    assert_stdout_contains(&output, "hunter2");
    assert_stdout_contains(&output, "5432");
}

#[test]
fn test_show_metadata() {
    let t = Test::sample();

    let output = t.show("kv", "app/db/creds");
    assert_stdout_contains(&output, "version  3");
    assert_stdout_contains(&output, "created  Mar 5, 2024 2:07 PM");

    let output = t.show("kv", "app/api");
    assert_stdout_contains(&output, "version  1");
    assert_stdout_contains(&output, "created  n/a");
}

#[test]
fn test_show_top_level_leaf() {
    let t = Test::sample();

    t.cmd()
        .args(["show", "team", "shared", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"));
}

#[test]
fn test_show_missing_secret() {
    let t = Test::sample();

    t.cmd()
        .args(["show", "kv", "app/nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in the current listing"));
}

#[test]
fn test_set_persists_to_store_file() {
    let t = Test::sample();

    let output = t.set("kv", "app/api", "token", "tok-456");
    assert_success(&output);
    assert_stdout_contains(&output, "set token");

    let output = t.reveal("kv", "app/api");
    assert_stdout_contains(&output, "tok-456");
    assert_stdout_contains(&output, "version  2");
    assert!(t.store_contents().contains("tok-456"));
}

#[test]
fn test_set_new_key() {
    let t = Test::sample();

    assert_success(&t.set("kv", "infra/dns", "ttl", "300"));

    let output = t.reveal("kv", "infra/dns");
    assert_stdout_contains(&output, "ttl");
    assert_stdout_contains(&output, "example.com");
}

#[test]
fn test_set_same_value_is_no_change() {
    let t = Test::sample();
    let before = t.store_contents();

    let output = t.set("kv", "app/db/creds", "username", "admin");
    assert_success(&output);
    assert_stdout_contains(&output, "no changes");
    assert_eq!(t.store_contents(), before);
}
