//! Unit tests for server catalog parsing and validation.

use std::time::Duration;

use mcp_scout::config::ScoutConfig;
use mcp_scout::AppError;

const CATALOG: &str = r#"
[servers.github]
command = "npx"
args = ["-y", "@modelcontextprotocol/server-github"]
timeout_seconds = 30

[servers.github.env]
GITHUB_TOKEN = "xyz"

[servers.sqlite]
command = "mcp-server-sqlite"

[servers.legacy]
command = "old-server"
disabled = true
"#;

#[test]
fn parses_full_catalog() {
    let config = ScoutConfig::from_toml_str(CATALOG).unwrap();
    assert_eq!(config.servers.len(), 3);

    let github = config.entry("github").unwrap();
    assert_eq!(github.command, "npx");
    assert_eq!(github.args, vec!["-y", "@modelcontextprotocol/server-github"]);
    assert_eq!(github.env.get("GITHUB_TOKEN").map(String::as_str), Some("xyz"));
    assert_eq!(github.timeout_seconds, 30);
    assert!(!github.disabled);
}

#[test]
fn entry_defaults_apply() {
    let config = ScoutConfig::from_toml_str(CATALOG).unwrap();
    let sqlite = config.entry("sqlite").unwrap();

    assert!(sqlite.args.is_empty());
    assert!(sqlite.env.is_empty());
    assert_eq!(sqlite.timeout_seconds, 15);
    assert!(!sqlite.disabled);
}

#[test]
fn enabled_skips_disabled_entries_in_name_order() {
    let config = ScoutConfig::from_toml_str(CATALOG).unwrap();
    let names: Vec<&str> = config.enabled().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["github", "sqlite"]);
}

#[test]
fn launch_spec_carries_entry_fields() {
    let config = ScoutConfig::from_toml_str(CATALOG).unwrap();
    let spec = config.entry("github").unwrap().launch_spec();

    assert_eq!(spec.command, "npx");
    assert_eq!(spec.args, vec!["-y", "@modelcontextprotocol/server-github"]);
    assert_eq!(spec.env.get("GITHUB_TOKEN").map(String::as_str), Some("xyz"));
    assert_eq!(spec.timeout, Duration::from_secs(30));
}

#[test]
fn unknown_server_is_a_config_error() {
    let config = ScoutConfig::from_toml_str(CATALOG).unwrap();
    match config.entry("missing") {
        Err(AppError::Config(msg)) => assert!(msg.contains("unknown server 'missing'")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn empty_command_is_rejected() {
    let result = ScoutConfig::from_toml_str("[servers.bad]\ncommand = \"  \"\n");
    match result {
        Err(AppError::Config(msg)) => assert!(msg.contains("empty command")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_config_error() {
    assert!(matches!(
        ScoutConfig::from_toml_str("servers = 'nope"),
        Err(AppError::Config(_))
    ));
}

#[test]
fn empty_catalog_is_valid() {
    let config = ScoutConfig::from_toml_str("").unwrap();
    assert!(config.servers.is_empty());
    assert!(config.enabled().is_empty());
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("servers.toml");
    std::fs::write(&path, CATALOG).unwrap();

    let config = ScoutConfig::load(&path).unwrap();
    assert_eq!(config.servers.len(), 3);

    match ScoutConfig::load(&dir.path().join("absent.toml")) {
        Err(AppError::Config(msg)) => assert!(msg.contains("cannot read")),
        other => panic!("expected config error, got {other:?}"),
    }
}
