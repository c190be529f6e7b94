//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a vaultview command pointed at this test's store.
    ///
    /// Returns a Command configured with:
    /// - HOME and XDG_CONFIG_HOME inside the temporary home directory
    /// - `--store` set to the temp store file
    /// - NO_COLOR so output can be matched literally
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--store").arg(self.store_path());
        cmd
    }

    /// Like [`Test::cmd`] but without `--store`.
    pub fn bare_cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("vaultview").expect("failed to find vaultview binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("VAULTVIEW_STORE");
        cmd.env_remove("VAULTVIEW_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `vaultview engines`.
    pub fn engines(&self) -> Output {
        self.cmd()
            .arg("engines")
            .output()
            .expect("failed to run vaultview engines")
    }

    /// Shortcut for `vaultview ls`.
    pub fn ls(&self, engine: &str, path: &str) -> Output {
        self.cmd()
            .args(["ls", engine, path])
            .output()
            .expect("failed to run vaultview ls")
    }

    /// Shortcut for `vaultview show`.
    pub fn show(&self, engine: &str, path: &str) -> Output {
        self.cmd()
            .args(["show", engine, path])
            .output()
            .expect("failed to run vaultview show")
    }

    /// Shortcut for `vaultview show --reveal`.
    pub fn reveal(&self, engine: &str, path: &str) -> Output {
        self.cmd()
            .args(["show", engine, path, "--reveal"])
            .output()
            .expect("failed to run vaultview show --reveal")
    }

    /// Shortcut for `vaultview set`.
    pub fn set(&self, engine: &str, path: &str, key: &str, value: &str) -> Output {
        self.cmd()
            .args(["set", engine, path, key, value])
            .output()
            .expect("failed to run vaultview set")
    }
}
