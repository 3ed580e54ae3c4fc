use crate::chat::{CounterLevel, CounterReading};
use colored::*;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::{Completer, Context, Helper, Validator};
use std::borrow::Cow;
use std::cell::Cell;

/// Character counter shown after the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterHint {
    display: String,
    reading: CounterReading,
}

impl CounterHint {
    /// No counter for an empty line or a slash command.
    pub fn for_line(line: &str) -> Option<Self> {
        if line.is_empty() || line.starts_with('/') {
            return None;
        }

        // The prompt is only open while no reply is pending.
        let reading = CounterReading::of(line, false);
        let display = if reading.sendable {
            format!("  [{} chars]", reading.chars)
        } else {
            format!("  [{} chars, nothing to send]", reading.chars)
        };
        Some(Self { display, reading })
    }

    pub fn reading(&self) -> CounterReading {
        self.reading
    }
}

impl Hint for CounterHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        None
    }
}

/// Line-editor helper that shows a live character counter as the hint.
#[derive(Completer, Helper, Validator)]
pub struct ComposerHelper {
    color: bool,
    // Reading behind the hint rustyline is about to draw.
    shown: Cell<Option<CounterReading>>,
}

impl ComposerHelper {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            shown: Cell::new(None),
        }
    }
}

impl Hinter for ComposerHelper {
    type Hint = CounterHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<CounterHint> {
        let hint = if pos < line.len() {
            None
        } else {
            CounterHint::for_line(line)
        };
        self.shown.set(hint.as_ref().map(CounterHint::reading));
        hint
    }
}

impl Highlighter for ComposerHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        let Some(reading) = self.shown.get().filter(|_| self.color) else {
            return Cow::Borrowed(hint);
        };
        Cow::Owned(style_hint(hint, reading).to_string())
    }
}

fn style_hint(hint: &str, reading: CounterReading) -> ColoredString {
    if !reading.sendable {
        return hint.dimmed().italic();
    }
    match reading.level {
        CounterLevel::Normal => hint.dimmed(),
        CounterLevel::Warning => hint.yellow(),
        CounterLevel::Critical => hint.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hint_for_empty_line_or_command() {
        assert_eq!(CounterHint::for_line(""), None);
        assert_eq!(CounterHint::for_line("/new"), None);
    }

    #[test]
    fn test_hint_counts_message() {
        let hint = CounterHint::for_line("roadmap").unwrap();
        assert_eq!(hint.display(), "  [7 chars]");
        assert_eq!(hint.reading().chars, 7);
        assert!(hint.reading().sendable);
    }

    #[test]
    fn test_whitespace_line_is_not_sendable() {
        let hint = CounterHint::for_line("   ").unwrap();
        assert!(!hint.reading().sendable);
        assert_eq!(hint.display(), "  [3 chars, nothing to send]");
    }

    #[test]
    fn test_hint_carries_counter_level() {
        let long = "a".repeat(1600);
        let hint = CounterHint::for_line(&long).unwrap();
        assert_eq!(hint.reading().level, CounterLevel::Warning);
        assert_eq!(hint.reading().chars, 1600);
    }

    #[test]
    fn test_highlight_uses_last_reading() {
        colored::control::set_override(true);
        let helper = ComposerHelper::new(true);
        let hint = CounterHint::for_line(&"a".repeat(1900)).unwrap();
        helper.shown.set(Some(hint.reading()));

        let styled = helper.highlight_hint(hint.display());
        assert_eq!(styled, hint.display().red().to_string());

        let plain = ComposerHelper::new(false);
        plain.shown.set(Some(hint.reading()));
        assert_eq!(plain.highlight_hint(hint.display()), hint.display());
    }
}
