//! Configuration file loading and environment overrides.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use faultline_client::config::apply_env_overrides;
use faultline_client::{load_config, ChannelProducer, Config, ConfigError, Producer, Reporter};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
    file.write_all(contents.as_bytes())
        .expect("should write config");
    file
}

#[test]
fn defaults_apply_when_sections_are_missing() {
    let config = Config::default();
    assert_eq!(config.reporter.service_name, "");
    assert_eq!(config.reporter.close_timeout_secs, 10);
    assert_eq!(config.reporter.channel_capacity, 1024);
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn loads_values_from_toml_file() {
    let file = write_config(
        r#"
[reporter]
service_name = "dataset-importer"
close_timeout_secs = 3
channel_capacity = 8

[logging]
level = "debug"
json = true
"#,
    );

    let mut config: Config =
        toml::from_str(&std::fs::read_to_string(file.path()).expect("read")).expect("parse");
    apply_env_overrides(&mut config, |_| None);

    assert_eq!(config.reporter.service_name, "dataset-importer");
    assert_eq!(config.reporter.close_timeout(), Duration::from_secs(3));
    assert_eq!(config.reporter.channel_capacity, 8);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn load_config_reads_file_path() {
    let file = write_config("[reporter]\nclose_timeout_secs = 7\n");
    let path = file.path().to_str().expect("utf-8 temp path");

    let config = load_config(Some(path)).expect("config should load");
    assert_eq!(config.reporter.close_timeout_secs, 7);
    assert_eq!(config.reporter.channel_capacity, 1024);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let path = dir.path().join("absent.toml");

    let config = load_config(path.to_str()).expect("missing file is not an error");
    assert_eq!(config.reporter.channel_capacity, 1024);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = write_config("[reporter\nservice_name = ");
    let path = file.path().to_str().expect("utf-8 temp path");

    let result = load_config(Some(path));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn environment_overrides_file_values() {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| match key {
        "FAULTLINE_SERVICE_NAME" => Some("from-env".to_string()),
        "FAULTLINE_CLOSE_TIMEOUT_SECS" => Some("30".to_string()),
        "FAULTLINE_CHANNEL_CAPACITY" => Some("64".to_string()),
        "FAULTLINE_LOG_LEVEL" => Some("warn".to_string()),
        "FAULTLINE_LOG_JSON" => Some("1".to_string()),
        _ => None,
    });

    assert_eq!(config.reporter.service_name, "from-env");
    assert_eq!(config.reporter.close_timeout_secs, 30);
    assert_eq!(config.reporter.channel_capacity, 64);
    assert_eq!(config.logging.level, "warn");
    assert!(config.logging.json);
}

#[test]
fn unparseable_numeric_overrides_are_ignored() {
    let mut config = Config::default();
    apply_env_overrides(&mut config, |key| match key {
        "FAULTLINE_CLOSE_TIMEOUT_SECS" => Some("soon".to_string()),
        "FAULTLINE_CHANNEL_CAPACITY" => Some("-1".to_string()),
        _ => None,
    });

    assert_eq!(config.reporter.close_timeout_secs, 10);
    assert_eq!(config.reporter.channel_capacity, 1024);
}

#[test]
fn reporter_from_config_uses_configured_timeout() {
    let mut config = Config::default();
    config.reporter.service_name = "dataset-importer".to_string();
    config.reporter.close_timeout_secs = 4;

    let (producer, _outbound) = ChannelProducer::new(config.reporter.channel_capacity);
    let producer: Arc<dyn Producer> = Arc::new(producer);
    let reporter =
        Reporter::from_config(&config.reporter, Some(producer)).expect("reporter should build");

    assert_eq!(reporter.service_name(), "dataset-importer");
    assert_eq!(reporter.close_timeout(), Duration::from_secs(4));
}

#[test]
fn reporter_from_config_requires_service_name() {
    let config = Config::default();
    let (producer, _outbound) = ChannelProducer::new(1);
    let producer: Arc<dyn Producer> = Arc::new(producer);

    assert!(Reporter::from_config(&config.reporter, Some(producer)).is_err());
}
