//! Tests for configuration resolution
//!
//! Priority order: CLI (already merged with env by clap) > TOML file >
//! compiled default. Missing or broken TOML files never stop startup.

use museum_common::config::{
    default_root_folder, CliOverrides, ServiceConfig, TomlConfig, DATABASE_FILE,
};
use std::path::PathBuf;

#[test]
fn test_defaults_when_nothing_configured() {
    let cfg = ServiceConfig::resolve(CliOverrides::default(), TomlConfig::default());

    assert_eq!(cfg.root_folder, default_root_folder());
    assert_eq!(cfg.bind, "127.0.0.1");
    assert_eq!(cfg.port, 8000);
    assert!(!cfg.require_auth);
    assert_eq!(cfg.listen_addr(), "127.0.0.1:8000");
}

#[test]
fn test_toml_overrides_defaults() {
    let file = TomlConfig::parse(
        r#"
        root_folder = "/srv/museum"
        port = 9100
        require_auth = true
        access_token_minutes = 15
        "#,
    )
    .unwrap();

    let cfg = ServiceConfig::resolve(CliOverrides::default(), file);
    assert_eq!(cfg.root_folder, PathBuf::from("/srv/museum"));
    assert_eq!(cfg.port, 9100);
    assert!(cfg.require_auth);
    assert_eq!(cfg.access_token_minutes, 15);
}

#[test]
fn test_cli_overrides_toml() {
    let file = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        port: Some(9100),
        require_auth: Some(true),
        ..Default::default()
    };
    let cli = CliOverrides {
        root_folder: Some(PathBuf::from("/from/cli")),
        port: Some(7000),
        require_auth: Some(false),
        bind: Some("0.0.0.0".to_string()),
    };

    let cfg = ServiceConfig::resolve(cli, file);
    assert_eq!(cfg.root_folder, PathBuf::from("/from/cli"));
    assert_eq!(cfg.port, 7000);
    assert!(!cfg.require_auth);
    assert_eq!(cfg.bind, "0.0.0.0");
}

#[test]
fn test_database_path_inside_root_folder() {
    let cli = CliOverrides {
        root_folder: Some(PathBuf::from("/data")),
        ..Default::default()
    };
    let cfg = ServiceConfig::resolve(cli, TomlConfig::default());
    assert_eq!(cfg.database_path(), PathBuf::from("/data").join(DATABASE_FILE));
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.toml");
    assert_eq!(TomlConfig::load_or_default(Some(&missing)), TomlConfig::default());
}

#[test]
fn test_broken_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = [not toml").unwrap();
    assert_eq!(TomlConfig::load_or_default(Some(&path)), TomlConfig::default());
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "bind = \"0.0.0.0\"\n").unwrap();
    let file = TomlConfig::load_or_default(Some(&path));
    assert_eq!(file.bind.as_deref(), Some("0.0.0.0"));
}

#[test]
fn test_ensure_root_folder_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a").join("b");
    let cli = CliOverrides {
        root_folder: Some(root.clone()),
        ..Default::default()
    };
    ServiceConfig::resolve(cli, TomlConfig::default())
        .ensure_root_folder()
        .unwrap();
    assert!(root.is_dir());
}
