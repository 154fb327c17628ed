//! Command-line tests against the `echo_args` demo binary

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;

use common::*;

fn run_demo(line: &str) -> std::process::Output {
    let binary = get_binary_path();
    test_command(&binary)
        .args(tokens(line))
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_positionals_and_default() {
    let output = run_demo("apple banana");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "Our fruits are: apple banana green |");
}

#[test]
fn test_short_full_name_option() {
    let output = run_demo("apple banana -cucumber pickled");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Our fruits are: apple banana pickled |"));
}

#[test]
fn test_abbreviated_long_option_and_rest() {
    let output = run_demo("apple banana --cu=pickled kiwi lime");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Our fruits are: apple banana pickled | kiwi, lime"));
}

#[test]
fn test_unknown_flag_lands_after_collected_values() {
    let output = run_demo("apple banana kiwi --zzz lime");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("| kiwi, lime, --zzz"));
}

#[test]
fn test_help_flag() {
    let output = run_demo("--help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(
        "Lists the fruits given on the command line.\nEvery argument arrives as text"
    ));
    assert!(stdout.contains("--cucumber"));
    assert!(stdout.contains("default: green"));
    assert!(stdout.contains("Usage: echo_args"));
}

#[test]
fn test_program_name_override() {
    let binary = get_binary_path();
    let output = test_command(&binary)
        .env("SIMPLE_CLI_ARGS_PROG", "fruit")
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: fruit"));
}

#[test]
fn test_missing_positional_exits_with_usage_error() {
    let output = run_demo("apple");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("banana"));
    assert!(stderr.contains("Usage:"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_runtime_failure_is_reported_not_fatal() {
    let output = run_demo("apple banana --cucumber=");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<_> = stderr.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "=".repeat(60));
    assert!(lines[1].starts_with("ERROR in "));
    assert!(lines[1].contains("main.rs, at line "));
    assert!(lines[1].ends_with("cucumber must not be empty"));
}
