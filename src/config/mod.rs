mod api;
mod defaults;
mod ui;
mod validation;

use crate::cli::Args;
use crate::error::{ChatError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use api::ApiConfig;
pub use defaults::{default_examples, default_welcome, DEFAULT_BASE_URL, DEFAULT_HEALTH_TIMEOUT_SECS};
pub use ui::UiConfig;
pub use validation::{expand_env_var_in_string, normalize_base_url};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Contents of a `.pm-chat.yaml` (or legacy JSON) config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub health_timeout: Duration,
    pub verbose: bool,
    pub health_check: bool,
    pub color: bool,
    pub welcome: String,
    pub examples: Vec<String>,
}

impl Config {
    pub fn from_env_and_args(args: &Args) -> Result<Self> {
        let file_config = match &args.config {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::load()?,
        };
        Self::from_sources(args, file_config, &|name: &str| env::var(name).ok())
    }

    /// Resolve settings with precedence CLI args > environment > config file > defaults.
    pub fn from_sources(
        args: &Args,
        file_config: FileConfig,
        env_lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let raw_endpoint = args
            .endpoint
            .clone()
            .or_else(|| env_lookup("PM_CHAT_ENDPOINT"))
            .or(file_config.api.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = normalize_base_url(&expand_env_var_in_string(&raw_endpoint, env_lookup))?;

        let request_timeout_secs = match args.timeout {
            Some(secs) => Some(secs),
            None => match env_lookup("PM_CHAT_TIMEOUT") {
                Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                    ChatError::ConfigError(format!(
                        "PM_CHAT_TIMEOUT must be a number of seconds, got '{}'",
                        value
                    ))
                })?),
                None => file_config.api.request_timeout_secs,
            },
        };
        let request_timeout = request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let health_timeout = Duration::from_secs(
            file_config
                .api
                .health_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_HEALTH_TIMEOUT_SECS),
        );

        let verbose = args.verbose
            || env_lookup("PM_CHAT_VERBOSE")
                .map(|v| defaults::is_truthy(&v))
                .or(file_config.session.verbose)
                .unwrap_or(false);

        let color = !args.no_color
            && env_lookup("NO_COLOR").map_or(true, |v| v.is_empty())
            && file_config.ui.color.unwrap_or(true);

        let welcome = file_config
            .ui
            .welcome
            .filter(|w| !w.trim().is_empty())
            .unwrap_or_else(default_welcome);

        let examples: Vec<String> = file_config
            .ui
            .examples
            .unwrap_or_else(default_examples)
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        Ok(Config {
            base_url,
            request_timeout,
            health_timeout,
            verbose,
            health_check: !args.no_health_check,
            color,
            welcome,
            examples,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(FileConfig::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );
        let config: FileConfig = if is_yaml {
            serde_yaml::from_str(&contents).with_context(|| {
                format!("Failed to parse YAML config file: {}", path.display())
            })?
        } else {
            serde_json::from_str(&contents).with_context(|| {
                format!("Failed to parse JSON config file: {}", path.display())
            })?
        };

        Ok(config)
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".pm-chat.yaml"),
            PathBuf::from(".pm-chat.yml"),
            PathBuf::from(".pm-chat.json"),
        ];

        if let Some(dir) = Self::user_config_dir() {
            paths.push(dir.join("pm-chat.yaml"));
            paths.push(dir.join("pm-chat.yml"));
            paths.push(dir.join("pm-chat.json"));
        }

        paths
    }

    fn user_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("pm-chat"))
    }

    pub fn example() -> Self {
        FileConfig {
            api: ApiConfig {
                base_url: Some(DEFAULT_BASE_URL.to_string()),
                request_timeout_secs: None,
                health_timeout_secs: Some(DEFAULT_HEALTH_TIMEOUT_SECS),
            },
            session: SessionConfig {
                verbose: Some(false),
            },
            ui: UiConfig {
                color: Some(true),
                welcome: Some(default_welcome()),
                examples: Some(default_examples()),
            },
        }
    }

    /// Write the example config to `path`, refusing to overwrite an existing file.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ChatError::ConfigError(format!(
                "config file already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_yaml::to_string(&Self::example())?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn default_init_path() -> Result<PathBuf> {
        Self::user_config_dir()
            .map(|dir| dir.join("pm-chat.yaml"))
            .ok_or_else(|| ChatError::ConfigError("cannot locate home directory".to_string()))
    }
}
