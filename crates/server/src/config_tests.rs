// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn empty_config_uses_defaults() {
    let config = ServerConfig::from_toml("").unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.bind.port(), 3000);
    assert_eq!(
        config.store,
        StoreConfig::Sqlite {
            path: PathBuf::from("issues.db")
        }
    );
}

#[test]
fn sqlite_store_with_path() {
    let config = ServerConfig::from_toml(
        r#"
bind = "127.0.0.1:8080"

[store]
backend = "sqlite"
path = "data/tracker.db"
"#,
    )
    .unwrap();
    assert_eq!(config.bind, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(
        config.store,
        StoreConfig::Sqlite {
            path: PathBuf::from("data/tracker.db")
        }
    );
    assert_eq!(config.store_description(), "sqlite (data/tracker.db)");
}

#[test]
fn sqlite_store_path_defaults() {
    let config = ServerConfig::from_toml("[store]\nbackend = \"sqlite\"\n").unwrap();
    assert_eq!(config.store, StoreConfig::default());
}

#[test]
fn memory_store() {
    let config = ServerConfig::from_toml("[store]\nbackend = \"memory\"\n").unwrap();
    assert_eq!(config.store, StoreConfig::Memory);
    assert_eq!(config.store_description(), "memory");
}

#[parameterized(
    bad_bind = { "bind = \"not an address\"" },
    bad_backend = { "[store]\nbackend = \"mongo\"" },
    not_toml = { "bind = " },
)]
fn invalid_config_is_a_parse_error(content: &str) {
    let err = ServerConfig::from_toml(content).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");
    fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();

    let config = ServerConfig::load(&path).unwrap();
    assert_eq!(config.store, StoreConfig::Memory);
}

#[test]
fn load_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ServerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
