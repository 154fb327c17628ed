//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::path::PathBuf;
use std::process::Command;

/// Helper to get the compiled demo binary path
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_echo_args"))
}

/// Helper to create a Command with test environment
/// Sets `NO_COLOR` so diagnostics compare as plain text
pub fn test_command(binary: &PathBuf) -> Command {
    let mut cmd = Command::new(binary);
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("SIMPLE_CLI_ARGS_PROG");
    cmd
}

/// Split a command line on whitespace
pub fn tokens(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}
