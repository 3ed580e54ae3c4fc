use std::fmt;

#[derive(Debug)]
pub enum ChatError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    ReadlineError(rustyline::error::ReadlineError),
    Other(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            ChatError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            ChatError::NetworkError(e) => write!(f, "Network error: {}", e),
            ChatError::Timeout => write!(f, "Request timeout"),
            ChatError::IoError(e) => write!(f, "IO error: {}", e),
            ChatError::JsonError(e) => write!(f, "JSON error: {}", e),
            ChatError::YamlError(e) => write!(f, "YAML error: {}", e),
            ChatError::ReadlineError(e) => write!(f, "Input error: {}", e),
            ChatError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ChatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChatError::NetworkError(e) => Some(e),
            ChatError::IoError(e) => Some(e),
            ChatError::JsonError(e) => Some(e),
            ChatError::YamlError(e) => Some(e),
            ChatError::ReadlineError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else {
            ChatError::NetworkError(err)
        }
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::IoError(err)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for ChatError {
    fn from(err: serde_yaml::Error) -> Self {
        ChatError::YamlError(err)
    }
}

impl From<rustyline::error::ReadlineError> for ChatError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ChatError::ReadlineError(err)
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(err: anyhow::Error) -> Self {
        ChatError::Other(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_anyhow_conversion_keeps_context_chain() {
        let err: ChatError = std::fs::read_to_string("/nonexistent/pm-chat.yaml")
            .context("Failed to read config file")
            .unwrap_err()
            .into();
        let text = err.to_string();
        assert!(text.starts_with("Failed to read config file: "));
        assert!(matches!(err, ChatError::Other(_)));
    }

    #[test]
    fn test_readline_error_is_input_error() {
        let err: ChatError = rustyline::error::ReadlineError::Eof.into();
        assert_eq!(err.to_string(), "Input error: EOF");
    }
}
