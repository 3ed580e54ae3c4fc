use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Text shown in place of an agent reply when a send fails.
pub const ERROR_REPLY: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Agent",
        }
    }
}

/// One entry in the conversation log. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            timestamp: Local::now(),
            is_error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            timestamp: Local::now(),
            is_error: false,
        }
    }

    pub fn error() -> Self {
        Self {
            sender: Sender::Assistant,
            content: ERROR_REPLY.to_string(),
            timestamp: Local::now(),
            is_error: true,
        }
    }

    /// Local wall-clock time, as shown next to the message.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}
