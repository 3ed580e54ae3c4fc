use serde::{Deserialize, Serialize};

pub const CHAT_MESSAGE_PATH: &str = "/api/chat/message";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatResponse {
    /// Session id the server wants used from now on, ignoring empty values.
    pub fn rotated_session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}
