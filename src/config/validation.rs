use crate::api::models::CHAT_MESSAGE_PATH;
use crate::error::{ChatError, Result};
use regex::Regex;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

/// Expand `${VAR_NAME}` references using `lookup`. Unknown variables are left as written.
pub fn expand_env_var_in_string(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    env_var_pattern()
        .replace_all(value, |caps: &regex::Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Reduce a configured endpoint to the service base URL.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let base = trimmed
        .strip_suffix(CHAT_MESSAGE_PATH)
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if base.is_empty() {
        return Err(ChatError::ConfigError("endpoint must not be empty".to_string()));
    }

    let parsed = reqwest::Url::parse(base)
        .map_err(|e| ChatError::ConfigError(format!("invalid endpoint '{}': {}", base, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ChatError::ConfigError(format!(
            "endpoint '{}' must use http or https",
            base
        )));
    }

    Ok(base.to_string())
}
