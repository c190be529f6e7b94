//! Test assertion helpers.

use std::process::Output;
use std::time::Duration;

use vaultview::core::session::{Session, View};

/// How long session tests wait on background jobs.
pub const WAIT: Duration = Duration::from_secs(5);

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stdout contains a string.
pub fn assert_stdout_contains(output: &Output, expected: &str) {
    let out = stdout(output);
    assert!(
        out.contains(expected),
        "stdout missing '{}', got: {}",
        expected,
        out
    );
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert stdout does NOT contain a string.
pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    let out = stdout(output);
    assert!(
        !out.contains(excluded),
        "stdout should not contain '{}', got: {}",
        excluded,
        out
    );
}

/// Wait for the session to go idle, failing the test if it doesn't.
pub fn settle(session: &mut Session) {
    assert!(session.wait_idle(WAIT), "session did not go idle");
}

/// Children shown by a session in `PathBrowse`.
pub fn shown_children(session: &Session) -> Vec<String> {
    match session.view() {
        View::PathBrowse {
            listing: Some(listing),
            ..
        } => listing.children,
        other => panic!("expected a listing, got {:?}", other),
    }
}

/// Path shown by a session in `PathBrowse`.
pub fn shown_path(session: &Session) -> String {
    match session.view() {
        View::PathBrowse { path, .. } => path.to_string(),
        other => panic!("expected path browse, got {:?}", other),
    }
}
