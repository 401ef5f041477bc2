//! Smoke tests for the inventory binary.

use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn run_inventory(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_inventory"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute inventory")
}

/// Config with a file database under a private home directory.
fn write_config(dir: &TempDir) -> String {
    let home = dir.path().join("home");
    let path = dir.path().join("config.yaml");
    let yaml = format!(
        r#"
home_dir: "{}"
database:
  url: "sqlite://inventory.db"
logging:
  default:
    console_level: "warn"
    file: ""
    file_level: "off"
"#,
        home.display()
    );
    std::fs::write(&path, yaml).expect("Failed to write config");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_lists_subcommands() {
    let output = run_inventory(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for sub in ["migrate", "patrimonies", "patrimony", "consumables", "items"] {
        assert!(stdout.contains(sub), "Should list '{sub}' subcommand");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_inventory(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("inventory"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_inventory(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
    assert!(String::from_utf8_lossy(&output.stderr).contains("error"));
}

#[test]
fn test_cli_invalid_yaml_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("invalid.yaml");
    std::fs::write(&path, "invalid: yaml: content: [unclosed").expect("Failed to write file");

    let output = run_inventory(&["--config", path.to_str().unwrap(), "items"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_print_config() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&dir);

    let output = run_inventory(&["--config", &config, "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sqlite://inventory.db"), "got: {stdout}");
}

#[test]
fn test_cli_lists_from_fresh_database() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&dir);

    let migrate = run_inventory(&["--config", &config, "migrate"]);
    assert!(
        migrate.status.success(),
        "migrate failed: {}",
        String::from_utf8_lossy(&migrate.stderr)
    );
    assert!(Path::new(&dir.path().join("home").join("inventory.db")).is_file());

    let items = run_inventory(&["--config", &config, "items", "--size", "5"]);
    assert!(items.status.success());
    let page: serde_json::Value =
        serde_json::from_slice(&items.stdout).expect("items output should be JSON");
    assert_eq!(page["total_count"], 0);
    assert_eq!(page["page_size"], 5);
    assert_eq!(page["items"], serde_json::json!([]));

    let missing = run_inventory(&["--config", &config, "patrimony", "1"]);
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("patrimony not found: 1"));
}
