//! CLI integration tests

use std::process::{Command, Output};

fn kdash(args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_kdash"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("KDASH_API_URL")
        .output()
        .expect("Failed to execute command")
}

fn kdash_against(url: &str, args: &[&str]) -> Output {
    let home = tempfile::tempdir().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_kdash"))
        .args(args)
        .env("HOME", home.path())
        .env("KDASH_API_URL", url)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = kdash(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Cluster Dashboard"), "Should show app name");
    for command in ["status", "alerts", "scan", "cost", "node", "health"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = kdash(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("kdash"), "Should show binary name");
}

/// Test status subcommand help
#[test]
fn test_status_help() {
    let output = kdash(&["status", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Status help should succeed");
    assert!(stdout.contains("--pods"), "Should show pods flag");
}

/// Test format and api-url options
#[test]
fn test_global_options() {
    let output = kdash(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("KDASH_API_URL"), "Should show env var");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = kdash(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}

/// Test missing required argument error handling
#[test]
fn test_node_requires_name() {
    let output = kdash(&["node"]);
    assert!(!output.status.success(), "Missing argument should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}

/// Test alerts against a stub dashboard
#[test]
fn test_alerts_json_output() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/alerts")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"severity": "critical", "message": "Pod nginx-xyz in CrashLoopBackOff",
                "timestamp": "2024-03-01T10:15:00+00:00"}]"#,
        )
        .create();

    let output = kdash_against(&server.url(), &["--format", "json", "alerts"]);
    mock.assert();

    assert!(output.status.success(), "Alerts should succeed");
    let alerts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(alerts[0]["severity"], "critical");
}

/// Test that node names are passed through in the path
#[test]
fn test_node_detail_table_output() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/nodes/worker-7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"name": "worker-7", "status": "Ready",
                "capacity": {"cpu": 8, "memory": "32Gi", "pods": 110},
                "usage": {"cpu": "45%", "memory": "60%", "pods": 12},
                "conditions": [{"type": "Ready", "status": "True",
                    "lastHeartbeatTime": "2024-03-01T10:15:00+00:00"}]}"#,
        )
        .create();

    let output = kdash_against(&server.url(), &["node", "worker-7"]);
    mock.assert();

    assert!(output.status.success(), "Node detail should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("worker-7"));
    assert!(stdout.contains("32Gi"));
}

/// Test that server errors fail the command
#[test]
fn test_server_error_fails_command() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/cost")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "error", "message": "sampler failed"}"#)
        .create();

    let output = kdash_against(&server.url(), &["cost"]);
    assert!(!output.status.success(), "Server error should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sampler failed"));
}
