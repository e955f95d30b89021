use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use grocery_engine::{ConfigError, EngineConfig, ListStore, DEFAULT_CONTENT_SELECTOR};
use pretty_assertions::assert_eq;

#[test]
fn defaults_match_the_documented_behaviour() {
    let config = EngineConfig::default_with_storage(PathBuf::from("/tmp/lists"));

    assert_eq!(config.load_delay(), Duration::from_millis(500));
    assert_eq!(config.retry_settings().attempts, 3);
    assert_eq!(config.retry_settings().delay, Duration::from_secs(1));
    assert_eq!(config.fetch_settings().content_selector, DEFAULT_CONTENT_SELECTOR);
    assert_eq!(config.parse_endpoint, None);
}

#[test]
fn ron_overrides_only_the_fields_it_names() {
    let config = EngineConfig::from_ron_str(
        r#"(
            storage_dir: "/var/lib/grocery",
            load_delay_ms: 0,
            parse_endpoint: Some("http://localhost:9000/parse"),
        )"#,
    )
    .expect("valid ron");

    assert_eq!(config.storage_dir, PathBuf::from("/var/lib/grocery"));
    assert_eq!(config.load_delay(), Duration::ZERO);
    assert_eq!(
        config.parse_endpoint.as_deref(),
        Some("http://localhost:9000/parse")
    );
    assert_eq!(config.scrape_attempts, 3);
    assert_eq!(config.request_timeout_ms, 30_000);
}

#[test]
fn zero_attempts_still_scrapes_once() {
    let config = EngineConfig {
        scrape_attempts: 0,
        ..EngineConfig::default()
    };

    assert_eq!(config.retry_settings().attempts, 1);
}

#[test]
fn malformed_ron_is_a_parse_error() {
    let err = EngineConfig::from_ron_str("(load_delay_ms: \"soon\")").expect_err("bad type");

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_a_file_and_opens_its_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("engine.ron");
    let storage = dir.path().join("data");
    fs::write(&config_path, format!("(storage_dir: {:?})", storage)).expect("write config");

    let config = EngineConfig::load(&config_path).expect("load");
    let store = config.open_store();

    assert_eq!(store.path(), storage.join("grocery-lists.json"));
    assert_eq!(store.read().expect("read"), None);
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");

    let err = EngineConfig::load(&dir.path().join("absent.ron")).expect_err("missing");

    assert!(matches!(err, ConfigError::Io { .. }));
}
