use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default)]
    pub color: Option<bool>,
    #[serde(default)]
    pub welcome: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<String>>,
}
