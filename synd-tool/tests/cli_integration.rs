//! CLI integration tests for synd-tool

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write a config pointing at a closed local port, so nothing leaves the machine
fn setup_config(agent_enabled: bool, api_key: Option<&str>) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let key_line = api_key
        .map(|k| format!("api_key = \"{}\"\n", k))
        .unwrap_or_default();
    let config_content = format!(
        r#"
[api]
base_url = "http://127.0.0.1:9"
{}timeout_secs = 5

[agent]
enabled = {}
confirm_destructive_actions = true
"#,
        key_line, agent_enabled
    );

    fs::write(&config_path, config_content).unwrap();
    (temp_dir, config_path)
}

fn synd_tool() -> Command {
    let mut cmd = Command::cargo_bin("synd-tool").unwrap();
    cmd.env_remove("SYNDICAST_CONFIG")
        .env_remove("SYNDICAST_API_KEY")
        .env_remove("SYNDICAST_LOG_FORMAT")
        .env_remove("SYNDICAST_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

fn run_tool(config: &Path, tool: &str, args: &str) -> (Option<i32>, Value) {
    let output = synd_tool()
        .arg("--config")
        .arg(config)
        .arg(tool)
        .arg(args)
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let result: Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout));
    (output.status.code(), result)
}

#[test]
fn test_help_documents_options_and_exit_codes() {
    synd_tool()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--list"))
        .stdout(predicate::str::contains("--yes"))
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("EXIT CODES"));
}

#[test]
fn test_list_prints_tool_definitions() {
    let output = synd_tool().arg("--list").output().unwrap();
    assert!(output.status.success());

    let defs: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = defs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();

    for expected in [
        "create_post",
        "create_thread",
        "list_posts",
        "list_linkedin_organizations",
        "check_account_health",
    ] {
        assert!(names.contains(&expected), "missing {}", expected);
    }
    assert!(defs[0]["inputSchema"].is_object());
}

#[test]
fn test_tool_is_required_without_list() {
    synd_tool().assert().failure();
}

#[test]
fn test_unknown_tool_is_invalid_input() {
    let (_dir, config) = setup_config(true, Some("sk_test"));
    let (code, result) = run_tool(&config, "delete_everything", "{}");

    assert_eq!(code, Some(3));
    assert_eq!(result["success"], false);
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("unknown tool 'delete_everything'"));
}

#[test]
fn test_single_item_thread_rejected() {
    let (_dir, config) = setup_config(true, Some("sk_test"));
    let (code, result) = run_tool(
        &config,
        "create_thread",
        r#"{"platform": "twitter", "items": [{"content": "only one"}]}"#,
    );

    assert_eq!(code, Some(3));
    assert_eq!(result["success"], false);
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("at least 2 items"));
}

#[test]
fn test_malformed_json_arguments() {
    let (_dir, config) = setup_config(true, Some("sk_test"));
    let (code, result) = run_tool(&config, "create_post", "{not json");

    assert_eq!(code, Some(3));
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("not valid JSON"));
}

#[test]
fn test_disabled_agent_refuses_tools() {
    let (_dir, config) = setup_config(false, Some("sk_test"));
    let (code, result) = run_tool(
        &config,
        "create_post",
        r#"{"content": "hello", "platforms": ["twitter"]}"#,
    );

    assert_eq!(code, Some(1));
    assert_eq!(result["success"], false);
    assert_eq!(result["message"], "agent tools are disabled");
}

#[test]
fn test_disabled_agent_needs_no_api_key() {
    let (_dir, config) = setup_config(false, None);
    let (code, result) = run_tool(&config, "list_accounts", "{}");

    assert_eq!(code, Some(1));
    assert_eq!(result["success"], false);
    assert_eq!(result["message"], "agent tools are disabled");
}

#[test]
fn test_missing_api_key_is_config_error() {
    let (_dir, config) = setup_config(true, None);
    let (code, result) = run_tool(&config, "list_accounts", "{}");

    assert_eq!(code, Some(1));
    assert!(result["message"].as_str().unwrap().contains("api.api_key"));
}

#[test]
fn test_api_key_from_environment() {
    let (_dir, config) = setup_config(true, None);
    let output = synd_tool()
        .env("SYNDICAST_API_KEY", "sk_env")
        .arg("--config")
        .arg(&config)
        .arg("create_thread")
        .arg(r#"{"platform": "threads", "items": []}"#)
        .output()
        .unwrap();

    // Key found, so the failure is the argument check rather than config
    assert_eq!(output.status.code(), Some(3));
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("at least 2 items"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let (code, result) = run_tool(
        &temp_dir.path().join("nope.toml"),
        "list_accounts",
        "{}",
    );

    assert_eq!(code, Some(1));
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("Failed to read config file"));
}

#[test]
fn test_unreachable_api_reports_network_error() {
    let (_dir, config) = setup_config(true, Some("sk_test"));
    let (code, result) = run_tool(&config, "list_accounts", "{}");

    assert_eq!(code, Some(1));
    assert_eq!(result["success"], false);
    assert!(result["message"].as_str().unwrap().contains("Network error"));
}
