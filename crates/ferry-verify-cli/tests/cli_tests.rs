//! CLI integration tests for ferry-verify.
//!
//! These tests verify command-line argument parsing, help output,
//! and exit codes for error conditions that occur before any store is
//! contacted.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

/// Get a command for the ferry-verify binary.
fn cmd() -> Command {
    Command::cargo_bin("ferry-verify").unwrap()
}

/// Write a syntactically valid config file pointing at unreachable stores.
fn valid_config_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
source:
  host: 127.0.0.1
  port: 1
  database: shop
  user: ferry
target:
  host: 127.0.0.1
  port: 2
  database: shop
  user: ferry
verify:
  tables: [shop.users, shop.orders]
"#
    )
    .unwrap();
    file
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_verify_subcommand_help() {
    cmd()
        .args(["verify", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--tables"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("Compare table checksums"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ferry-verify"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_output_json_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"));
}

#[test]
fn test_log_format_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--log-format"))
        .stdout(predicate::str::contains("[default: text]"));
}

#[test]
fn test_verbosity_flag_exists() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbosity"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_config_default_path() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: config.yaml]"));
}

#[test]
fn test_short_config_flag() {
    cmd()
        .args(["-c", "some_config.yaml", "--help"])
        .assert()
        .success();
}

// =============================================================================
// Exit Code Tests - Config Errors
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    // Missing file is an IO error (code 7), not config error (code 1)
    cmd()
        .args(["--config", "nonexistent_config_file.yaml", "verify"])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "invalid: yaml: content: [").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "verify"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_empty_config_exits_with_code_1() {
    let file = tempfile::NamedTempFile::new().unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_missing_required_fields_exits_with_code_1() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "source:").unwrap();
    writeln!(file, "  type: mysql").unwrap();

    cmd()
        .args(["--config", file.path().to_str().unwrap(), "health-check"])
        .assert()
        .code(1);
}

#[test]
fn test_zero_timeout_override_rejected() {
    let file = valid_config_file();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "verify",
            "--timeout",
            "0",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
fn test_blank_tables_override_rejected() {
    let file = valid_config_file();

    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "verify",
            "--tables",
            "shop.users, ",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("empty table name"));
}

#[test]
fn test_tables_override_is_trimmed() {
    let file = valid_config_file();

    // Stores are unreachable; the table list is logged before connecting.
    cmd()
        .args([
            "--config",
            file.path().to_str().unwrap(),
            "verify",
            "--tables",
            "shop.users, shop.orders",
        ])
        .timeout(Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains(r#"["shop.users", "shop.orders"]"#));
}

// =============================================================================
// No Subcommand Tests
// =============================================================================

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}
