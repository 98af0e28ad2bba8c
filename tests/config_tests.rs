use std::io::Write;

use executor_portal::config::{self, AppConfig};

fn write_temp_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn embedded_defaults_match_default_impl() {
    let loaded = config::load_with(None).unwrap();
    let builtin = AppConfig::default();
    assert_eq!(loaded.server.host, builtin.server.host);
    assert_eq!(loaded.server.port, builtin.server.port);
    assert_eq!(loaded.client, builtin.client);
}

#[test]
fn custom_file_overrides_client_settings() {
    let file = write_temp_config(
        r#"
[client]
max_file_size = 1048576
allowed_extensions = [".xlsx", ".csv"]
"#,
    );
    let cfg = config::load_with(Some(file.path())).unwrap();
    assert_eq!(cfg.client.max_file_size, 1_048_576);
    assert_eq!(cfg.client.allowed_extensions, vec![".xlsx", ".csv"]);
    assert_eq!(cfg.client.search_debounce_ms, 300);
}

#[test]
fn missing_custom_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(config::load_with(Some(dir.path().join("absent.toml").as_path())).is_err());
}

#[test]
fn invalid_server_port() {
    let mut cfg = AppConfig::default();
    cfg.server.port = 0;
    let err = config::validate(&cfg).unwrap_err();
    assert!(err.to_string().contains("invalid server.port"));
}

#[test]
fn extensions_need_leading_dot() {
    let mut cfg = AppConfig::default();
    cfg.client.allowed_extensions = vec!["xlsx".to_string()];
    assert!(config::validate(&cfg).is_err());
    cfg.client.allowed_extensions.clear();
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn zero_limits_are_rejected() {
    let mut cfg = AppConfig::default();
    cfg.client.max_file_size = 0;
    assert!(config::validate(&cfg).is_err());

    let mut cfg = AppConfig::default();
    cfg.client.search_debounce_ms = 0;
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn relative_urls_are_rejected() {
    let mut cfg = AppConfig::default();
    cfg.client.submit_url = "process".to_string();
    assert!(config::validate(&cfg).is_err());
}
