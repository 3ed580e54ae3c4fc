use pm_chat::cli::Args;
use pm_chat::config::{default_examples, Config, FileConfig, DEFAULT_BASE_URL};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = Config::from_sources(&Args::default(), FileConfig::default(), &no_env).unwrap();

    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.request_timeout, None);
    assert_eq!(config.health_timeout, Duration::from_secs(10));
    assert!(!config.verbose);
    assert!(config.health_check);
    assert!(config.color);
    assert_eq!(config.examples, default_examples());
}

#[test]
fn test_cli_beats_env_beats_file() {
    let mut file = FileConfig::default();
    file.api.base_url = Some("http://file:1".to_string());
    let env = env_from(&[("PM_CHAT_ENDPOINT", "http://env:2")]);

    let from_file = Config::from_sources(&Args::default(), file.clone(), &no_env).unwrap();
    assert_eq!(from_file.base_url, "http://file:1");

    let from_env = Config::from_sources(&Args::default(), file.clone(), &env).unwrap();
    assert_eq!(from_env.base_url, "http://env:2");

    let args = Args {
        endpoint: Some("http://cli:3/".to_string()),
        ..Args::default()
    };
    let from_cli = Config::from_sources(&args, file, &env).unwrap();
    assert_eq!(from_cli.base_url, "http://cli:3");
}

#[test]
fn test_endpoint_env_expansion() {
    let args = Args {
        endpoint: Some("https://${PM_HOST}/api/chat/message".to_string()),
        ..Args::default()
    };
    let env = env_from(&[("PM_HOST", "pm.example.com")]);

    let config = Config::from_sources(&args, FileConfig::default(), &env).unwrap();
    assert_eq!(config.base_url, "https://pm.example.com");
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let args = Args {
        endpoint: Some("localhost without scheme".to_string()),
        ..Args::default()
    };
    assert!(Config::from_sources(&args, FileConfig::default(), &no_env).is_err());
}

#[test]
fn test_timeouts() {
    let mut file = FileConfig::default();
    file.api.request_timeout_secs = Some(45);
    file.api.health_timeout_secs = Some(3);

    let config = Config::from_sources(&Args::default(), file.clone(), &no_env).unwrap();
    assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
    assert_eq!(config.health_timeout, Duration::from_secs(3));

    let env = env_from(&[("PM_CHAT_TIMEOUT", "0")]);
    let disabled = Config::from_sources(&Args::default(), file.clone(), &env).unwrap();
    assert_eq!(disabled.request_timeout, None);

    let bad = env_from(&[("PM_CHAT_TIMEOUT", "soon")]);
    assert!(Config::from_sources(&Args::default(), file, &bad).is_err());
}

#[test]
fn test_verbose_and_color_flags() {
    let env = env_from(&[("PM_CHAT_VERBOSE", "yes"), ("NO_COLOR", "1")]);
    let config = Config::from_sources(&Args::default(), FileConfig::default(), &env).unwrap();
    assert!(config.verbose);
    assert!(!config.color);

    let args = Args {
        no_color: true,
        no_health_check: true,
        ..Args::default()
    };
    let config = Config::from_sources(&args, FileConfig::default(), &no_env).unwrap();
    assert!(!config.color);
    assert!(!config.health_check);
}

#[test]
fn test_load_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pm-chat.yaml");
    fs::write(
        &path,
        r#"
api:
  base_url: http://agent.internal:9000
session:
  verbose: true
ui:
  welcome: "Hi, PM here."
  examples:
    - "Write user stories"
    - "   "
"#,
    )
    .unwrap();

    let file = FileConfig::load_from(&path).unwrap();
    let config = Config::from_sources(&Args::default(), file, &no_env).unwrap();

    assert_eq!(config.base_url, "http://agent.internal:9000");
    assert!(config.verbose);
    assert_eq!(config.welcome, "Hi, PM here.");
    assert_eq!(config.examples, vec!["Write user stories".to_string()]);
}

#[test]
fn test_load_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pm-chat.json");
    fs::write(&path, r#"{"api": {"request_timeout_secs": 20}}"#).unwrap();

    let file = FileConfig::load_from(&path).unwrap();
    assert_eq!(file.api.request_timeout_secs, Some(20));
    assert_eq!(file.api.base_url, None);
}

#[test]
fn test_load_malformed_file_names_the_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yaml");
    fs::write(&path, "api: [not, a, map").unwrap();

    let err = FileConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("broken.yaml"));
}

#[test]
fn test_write_example_round_trips_and_refuses_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("pm-chat.yaml");

    FileConfig::write_example(&path).unwrap();
    let loaded = FileConfig::load_from(&path).unwrap();
    assert_eq!(loaded.api.base_url.as_deref(), Some(DEFAULT_BASE_URL));
    assert_eq!(loaded.ui.examples, Some(default_examples()));

    assert!(FileConfig::write_example(&path).is_err());
}
