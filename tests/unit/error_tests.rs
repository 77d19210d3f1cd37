//! Unit tests for the shared error type.

use mcp_scout::AppError;

#[test]
fn display_includes_domain_prefix() {
    assert_eq!(
        AppError::Config("bad catalog".into()).to_string(),
        "config: bad catalog"
    );
    assert_eq!(
        AppError::Spawn("no such file".into()).to_string(),
        "spawn: no such file"
    );
    assert_eq!(
        AppError::Protocol("line too long".into()).to_string(),
        "protocol: line too long"
    );
    assert_eq!(AppError::Io("pipe closed".into()).to_string(), "io: pipe closed");
}

#[test]
fn toml_errors_convert_to_config() {
    let err = toml::from_str::<toml::Value>("= broken").unwrap_err();
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Config(_)));
    assert!(app.to_string().starts_with("config: invalid config:"));
}
