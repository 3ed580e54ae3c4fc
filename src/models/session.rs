use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const RANDOM_PART_LEN: usize = 9;

/// Opaque token correlating a conversation with the backend agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh `session_<random>_<millis>` identifier.
    pub fn generate() -> Self {
        let random = Uuid::new_v4().simple().to_string();
        Self(format!(
            "session_{}_{}",
            &random[..RANDOM_PART_LEN],
            Local::now().timestamp_millis()
        ))
    }

    /// Generate an identifier guaranteed to differ from `previous`.
    pub fn generate_after(previous: &SessionId) -> Self {
        loop {
            let next = Self::generate();
            if &next != previous {
                return next;
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_shape() {
        let id = SessionId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1].len(), RANDOM_PART_LEN);
        assert!(parts[2].parse::<i64>().is_ok());
    }

    #[test]
    fn test_generate_after_differs() {
        let first = SessionId::from("session_abc_1");
        let next = SessionId::generate_after(&first);
        assert_ne!(first, next);
    }
}
