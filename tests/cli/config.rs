//! Tests for config file and environment handling.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_store_from_config_file() {
    let t = Test::sample();
    let config = t.write_config(&format!("store = {:?}\n", t.store_path()));

    t.bare_cmd()
        .arg("--config")
        .arg(&config)
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("kv"));
}

#[test]
fn test_store_from_default_config_location() {
    let t = Test::sample();
    let dir = t.home.path().join(".config").join("vaultview");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        format!("store = {:?}\n", t.store_path()),
    )
    .unwrap();

    let output = t.bare_cmd().arg("engines").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "team");
}

#[test]
fn test_store_from_environment() {
    let t = Test::sample();

    t.bare_cmd()
        .env("VAULTVIEW_STORE", t.store_path())
        .arg("engines")
        .assert()
        .success()
        .stdout(predicate::str::contains("scratch"));
}

#[test]
fn test_custom_mask() {
    let t = Test::sample();
    let config = t.write_config("mask = \"<hidden>\"\n");

    t.cmd()
        .arg("--config")
        .arg(&config)
        .args(["show", "kv", "app/api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<hidden>"))
        .stdout(predicate::str::contains("tok-123").not());
}

#[test]
fn test_invalid_config_value() {
    let t = Test::sample();
    let config = t.write_config("status_ttl_secs = 0\n");

    t.cmd()
        .arg("--config")
        .arg(&config)
        .arg("engines")
        .assert()
        .failure()
        .stderr(predicate::str::contains("status_ttl_secs"));
}

#[test]
fn test_missing_explicit_config() {
    let t = Test::sample();

    t.cmd()
        .args(["--config", "nope.toml", "engines"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}
