// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use obscura::Config;
use obscura::backends::camera::CameraPosition;
use obscura::constants::DEFAULT_SAVE_FOLDER;
use obscura::errors::ConfigError;
use obscura::gallery::{ANDROID_GALLERY_URI, IOS_GALLERY_URL, Platform};
use std::io::Write;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.default_position, CameraPosition::Back);
    assert_eq!(config.save_folder_name, DEFAULT_SAVE_FOLDER);
    assert!(config.gallery_overrides.is_empty());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load(&dir.path().join("config.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "default_position": "front", "save_folder_name": "Shots" }}"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.default_position, CameraPosition::Front);
    assert_eq!(config.save_folder_name, "Shots");
    assert!(config.photo_directory().ends_with("Shots"));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    let result = Config::load(file.path());
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_gallery_targets_builtin() {
    let targets = Config::default().gallery_targets();
    assert_eq!(targets.lookup(Platform::Ios), Some(IOS_GALLERY_URL));
    assert_eq!(targets.lookup(Platform::Android), Some(ANDROID_GALLERY_URI));
    assert!(targets.lookup(Platform::Desktop).is_some());
}
