//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;

use tempfile::TempDir;

use alloctree::application::ApplicationError;
use alloctree::config::{local_config_path, Settings};

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.display.decimals, 2);
}

#[test]
fn given_local_display_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[display]\ndecimals = 4\ncolor = false\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.display.decimals, 4);
    assert!(!settings.display.color);
}

#[test]
fn given_relative_seed_file_when_load_then_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "seed_file = \"data/goods.toml\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(
        settings.seed_file,
        Some(dir.path().join("data/goods.toml"))
    );
}

#[test]
fn given_absolute_seed_file_when_load_then_kept_as_is() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "seed_file = \"/srv/ledger/goods.toml\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(
        settings.seed_file.as_deref(),
        Some(std::path::Path::new("/srv/ledger/goods.toml"))
    );
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[display\ndecimals = ").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    match err {
        ApplicationError::Config { message } => {
            assert!(message.contains(".alloctree.toml"), "message: {message}")
        }
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn given_wrong_type_in_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "[display]\ndecimals = \"many\"\n").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}
