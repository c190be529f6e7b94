//! Tests for the interactive browser entry point.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_browse_requires_terminal() {
    let t = Test::sample();

    t.cmd()
        .arg("browse")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

#[test]
fn test_browse_is_default_command() {
    let t = Test::sample();

    t.cmd()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}
