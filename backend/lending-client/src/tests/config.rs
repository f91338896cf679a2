use crate::config::{BASE_URL_ENV_VAR, ClientConfig};
use crate::error::ConfigError;

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

#[test]
fn given_no_config_file_when_load_then_defaults_returned() {
    let dir = TempDir::new().expect("temp dir");

    let config = ClientConfig::load(dir.path()).expect("defaults");

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.base_url, "http://127.0.0.1:8000/api/");
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.refresh_timeout(), Duration::from_secs(10));
    assert_eq!(config.login_route, "/login");
    assert_eq!(config.redirect_delay(), Duration::from_millis(1000));
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.notification_ttl(), Duration::from_secs(7));
}

/// **VALUE**: Saved settings come back unchanged and no temp file is left over.
///
/// **BUG THIS CATCHES**: A rename that never happens (temp file left behind,
/// stale config loaded).
#[test]
fn given_saved_config_when_load_then_values_preserved() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = ClientConfig::default();
    config.base_url = "https://lending.example.com/api/".to_string();
    config.retry.max_attempts = 5;

    config.save(dir.path()).expect("save");
    let loaded = ClientConfig::load(dir.path()).expect("load");

    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn given_corrupt_file_when_load_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join("config.json"), "{ not json").expect("write");

    let result = ClientConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_partial_file_when_load_then_missing_fields_defaulted() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"base_url": "http://10.0.0.5:9000/api", "retry": {"max_attempts": 4}}"#,
    )
    .expect("write");

    let config = ClientConfig::load(dir.path()).expect("load");

    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.retry.max_delay_ms, 5000);
    assert_eq!(config.request_timeout_secs, 30);
}

#[test]
fn given_invalid_values_when_validate_then_rejected() {
    let cases: Vec<Box<dyn Fn(&mut ClientConfig)>> = vec![
        Box::new(|c| c.base_url = "ftp://files.example.com/".to_string()),
        Box::new(|c| c.request_timeout_secs = 0),
        Box::new(|c| c.refresh_timeout_secs = 0),
        Box::new(|c| c.retry.max_attempts = 0),
        Box::new(|c| c.retry.initial_delay_ms = 10_000),
        Box::new(|c| c.login_route = "login".to_string()),
        Box::new(|c| c.version = 2),
    ];

    for mutate in cases {
        let mut config = ClientConfig::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "{config:?} should be invalid"
        );
    }
}

/// **VALUE**: A base URL without a trailing slash still keeps its path
/// prefix when endpoints are joined.
///
/// **BUG THIS CATCHES**: `Url::join("clients/")` on `.../api` replacing the
/// last segment and hitting `/clients/` instead of `/api/clients/`.
#[test]
fn given_base_url_without_trailing_slash_when_parsed_then_slash_appended() {
    let mut config = ClientConfig::default();
    config.base_url = "https://lending.example.com/api".to_string();

    let url = config.base_url().expect("url");

    assert_eq!(url.as_str(), "https://lending.example.com/api/");
    assert_eq!(
        url.join("clients/").expect("join").as_str(),
        "https://lending.example.com/api/clients/"
    );
}

#[test]
#[serial]
fn given_env_override_when_applied_then_base_url_replaced() {
    // SAFETY: serialized with every other test touching the environment.
    unsafe { std::env::set_var(BASE_URL_ENV_VAR, "https://staging.example.com/api/") };

    let result = ClientConfig::default().with_env_overrides();

    unsafe { std::env::remove_var(BASE_URL_ENV_VAR) };
    let config = result.expect("override");
    assert_eq!(config.base_url, "https://staging.example.com/api/");
}

#[test]
#[serial]
fn given_invalid_env_override_when_applied_then_validation_error() {
    // SAFETY: serialized with every other test touching the environment.
    unsafe { std::env::set_var(BASE_URL_ENV_VAR, "not-a-url") };

    let result = ClientConfig::default().with_env_overrides();

    unsafe { std::env::remove_var(BASE_URL_ENV_VAR) };
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}
