pub const COUNTER_WARNING_THRESHOLD: usize = 1500;
pub const COUNTER_CRITICAL_THRESHOLD: usize = 1800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Normal,
    Warning,
    Critical,
}

impl CounterLevel {
    pub fn for_length(length: usize) -> Self {
        if length > COUNTER_CRITICAL_THRESHOLD {
            CounterLevel::Critical
        } else if length > COUNTER_WARNING_THRESHOLD {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        }
    }
}

/// Whether `text` may be sent right now.
pub fn can_send(text: &str, is_typing: bool) -> bool {
    !is_typing && !text.trim().is_empty()
}

/// Values derived from the input text on every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterReading {
    /// Characters in the raw text, whitespace included.
    pub chars: usize,
    pub level: CounterLevel,
    pub sendable: bool,
}

impl CounterReading {
    pub fn of(text: &str, is_typing: bool) -> Self {
        let chars = text.chars().count();
        Self {
            chars,
            level: CounterLevel::for_length(chars),
            sendable: can_send(text, is_typing),
        }
    }
}

/// The input box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    text: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}
