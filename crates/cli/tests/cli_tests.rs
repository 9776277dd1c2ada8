//! CLI integration tests

use std::process::Command;

fn hmctl(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "hm-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = hmctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Equipment Health Monitor"),
        "Should show app name"
    );
    for command in ["health", "analyze", "alerts", "stats", "replay"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = hmctl(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("hmctl"), "Should show binary name");
}

/// Test analyze command help
#[test]
fn test_analyze_help() {
    let output = hmctl(&["analyze", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Analyze help should succeed");
    assert!(stdout.contains("--current"), "Should show current option");
    assert!(stdout.contains("--voltage"), "Should show voltage option");
    assert!(
        stdout.contains("--temperature"),
        "Should show temperature option"
    );
}

/// Test format and api-url options
#[test]
fn test_global_options() {
    let output = hmctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("HMCTL_API_URL"), "Should show env var");
}

/// Test missing required argument error handling
#[test]
fn test_replay_missing_argument() {
    let output = hmctl(&["replay"]);

    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}

/// Test unreachable service error handling
#[test]
fn test_unreachable_service() {
    let output = hmctl(&["--api-url", "http://127.0.0.1:9", "health"]);

    assert!(!output.status.success(), "Unreachable service should fail");
}
