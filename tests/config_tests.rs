// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use guardian_erp::api::Envelope;
use guardian_erp::config::{ENV_API_TOKEN, ENV_API_URL, Settings, default_config_path};
use tempfile::tempdir;

#[test]
fn empty_file_means_defaults() {
    let s = Settings::from_yaml("").unwrap();
    assert_eq!(s.api.base_url, "http://localhost:5000/api");
    assert_eq!(s.api.timeout_secs, 15);
    assert_eq!(s.api.page_limit, 1000);
    assert_eq!(s.api.envelope, Envelope::Flat);
    assert_eq!(s.api.chat_envelope, Envelope::Nested);
    assert_eq!(s.logging.level, "warn");
    assert!(s.database.is_none());
    s.validate().unwrap();
}

#[test]
fn partial_yaml_overrides_only_what_it_names() {
    let s = Settings::from_yaml(
        "api:\n  base_url: https://erp.example.rw/api\n  chat_envelope: flat\nlogging:\n  level: debug\n",
    )
    .unwrap();
    assert_eq!(s.api.base_url, "https://erp.example.rw/api");
    assert_eq!(s.api.chat_envelope, Envelope::Flat);
    assert_eq!(s.api.timeout_secs, 15);
    assert_eq!(s.logging.level, "debug");
}

#[test]
fn malformed_yaml_is_a_config_error() {
    assert!(Settings::from_yaml("api: [unclosed").is_err());
}

#[test]
fn environment_overrides_url_and_token() {
    let mut s = Settings::default();
    s.apply_env(|k| match k {
        k if k == ENV_API_URL => Some("https://prod.example/api".into()),
        k if k == ENV_API_TOKEN => Some("secret".into()),
        _ => None,
    });
    assert_eq!(s.api.base_url, "https://prod.example/api");
    assert_eq!(s.api.token.as_deref(), Some("secret"));

    let mut blank = Settings::default();
    blank.apply_env(|_| Some("  ".into()));
    assert_eq!(blank.api.base_url, "http://localhost:5000/api");
    assert!(blank.api.token.is_none());
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.api.base_url = "ftp://nope".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.api.timeout_secs = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.api.page_limit = 0;
    assert!(s.validate().is_err());
}

#[test]
fn write_default_creates_once_and_loads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    assert!(Settings::write_default(&path).unwrap());
    assert!(!Settings::write_default(&path).unwrap());

    let s = Settings::from_yaml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(s.api.page_limit, 1000);
    assert_eq!(s.api.chat_envelope, Envelope::Nested);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    assert!(Settings::load(Some(missing.as_path())).is_err());
}

#[test]
fn database_path_uses_the_configured_file() {
    let s = Settings::from_yaml("database: /tmp/guardian-test.sqlite\n").unwrap();
    assert_eq!(s.database_path().unwrap(), std::path::PathBuf::from("/tmp/guardian-test.sqlite"));
}

#[test]
fn default_config_lives_in_the_application_dir() {
    let path = default_config_path().unwrap();
    assert!(path.ends_with("config.yaml"));
    assert!(path.to_string_lossy().to_lowercase().contains("guardian"), "{}", path.display());
}

#[test]
fn logging_can_be_installed_twice() {
    let settings = Settings::default();
    guardian_erp::logging::init_logging(&settings.logging, false);
    guardian_erp::logging::init_logging(&settings.logging, true);
}
