//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Path of the compiled `chore` binary.
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chore"))
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Helper to create an env file in a directory
pub fn create_env_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Package version for testing --version flag
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to create a Command isolated from the caller's chore settings.
pub fn test_command(dir: &Path) -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.current_dir(dir)
        .env_remove("CHORE_ENV_FILE")
        .env_remove("CHORE_TOOLCHAIN")
        .env_remove("CHORE_LOG")
        .env("SHELL", "/bin/bash");
    cmd
}

/// Install a fake `cargo` in `bin_dir` that records its arguments and working
/// directory next to itself and exits with `$FAKE_CARGO_EXIT` (default 0).
#[cfg(unix)]
pub fn install_fake_cargo(bin_dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(bin_dir).unwrap();
    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{dir}/args'\npwd > '{dir}/pwd'\nexit \"${{FAKE_CARGO_EXIT:-0}}\"\n",
        dir = bin_dir.display()
    );
    let path = bin_dir.join("cargo");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// `PATH` with `first` in front of the current value.
pub fn path_with(first: &Path) -> String {
    let current = std::env::var("PATH").unwrap_or_default();
    format!("{}:{current}", first.display())
}

/// Lines the fake cargo recorded as its arguments.
pub fn recorded_args(bin_dir: &Path) -> Vec<String> {
    fs::read_to_string(bin_dir.join("args"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
