use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Online",
            ConnectionStatus::Error => "Connection Error",
        }
    }
}
