pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 10;

pub fn default_welcome() -> String {
    "Welcome! I'm your product management assistant. Ask me about roadmaps, \
     user stories, prioritization, or market research."
        .to_string()
}

pub fn default_examples() -> Vec<String> {
    vec![
        "Help me write user stories for a checkout redesign".to_string(),
        "How should I prioritize features for the next quarter?".to_string(),
        "Draft a product roadmap for a mobile fitness app".to_string(),
        "What metrics should we track after launch?".to_string(),
    ]
}

pub fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
