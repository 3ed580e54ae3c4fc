use crate::chat::{ChatEvent, ChatState, ChatSubscriber};
use crate::models::{ConnectionStatus, Message, Sender};
use colored::*;
use std::io::{self, Write};

const MAX_RULE_WIDTH: usize = 72;
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Print a `[chat]` diagnostic line to stderr when verbose output is on.
pub fn display_diagnostic(verbose: bool, message: &str) {
    if verbose {
        eprintln!("{}", format!("[chat] {}", message).dimmed());
    }
}

pub fn print_info(message: &str) {
    println!("{}", message.cyan());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red(), message);
}

fn rule_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(MAX_RULE_WIDTH)
        .min(MAX_RULE_WIDTH)
}

/// Header line plus indented body for one log entry.
pub fn format_message(message: &Message) -> String {
    let label = match (message.sender, message.is_error) {
        (_, true) => message.sender.label().red().bold(),
        (Sender::User, false) => message.sender.label().green().bold(),
        (Sender::Assistant, false) => message.sender.label().cyan().bold(),
    };
    let header = format!("{} {}", label, message.time_label().dimmed());

    let body = message
        .content
        .lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    let body = if message.is_error {
        body.red().to_string()
    } else {
        body
    };

    format!("{}\n{}", header, body)
}

pub fn format_status(status: ConnectionStatus) -> String {
    let dot = match status {
        ConnectionStatus::Connecting => "●".yellow(),
        ConnectionStatus::Connected => "●".green(),
        ConnectionStatus::Error => "●".red(),
    };
    format!("{} {}", dot, status.label())
}

/// Draws the conversation to a terminal as events arrive.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    welcome: String,
    examples: Vec<String>,
    typing_visible: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(welcome: String, examples: Vec<String>) -> Self {
        Self::new(io::stdout(), welcome, examples)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W, welcome: String, examples: Vec<String>) -> Self {
        Self {
            out,
            welcome,
            examples,
            typing_visible: false,
        }
    }

    fn clear_typing(&mut self) -> io::Result<()> {
        if self.typing_visible {
            write!(self.out, "{}", CLEAR_LINE)?;
            self.typing_visible = false;
        }
        Ok(())
    }

    fn show_typing(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "{}",
            "Agent is typing... (Ctrl+C to stop waiting)".dimmed()
        )?;
        self.typing_visible = true;
        Ok(())
    }

    pub fn render_welcome(&mut self) -> io::Result<()> {
        let rule = "─".repeat(rule_width());
        writeln!(self.out, "{}", rule.dimmed())?;
        writeln!(self.out, "{}", self.welcome.bold())?;
        if !self.examples.is_empty() {
            writeln!(self.out)?;
            self.render_examples()?;
        }
        writeln!(self.out, "{}", rule.dimmed())?;
        self.out.flush()
    }

    pub fn render_examples(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "Try one of these (/example <n>):".dimmed())?;
        for (index, example) in self.examples.iter().enumerate() {
            writeln!(self.out, "  {} \"{}\"", format!("[{}]", index + 1).cyan(), example)?;
        }
        self.out.flush()
    }

    pub fn render_history(&mut self, messages: &[Message]) -> io::Result<()> {
        if messages.is_empty() {
            writeln!(self.out, "{}", "No messages yet.".dimmed())?;
        }
        for message in messages {
            writeln!(self.out, "{}\n", format_message(message))?;
        }
        self.out.flush()
    }

    fn render(&mut self, event: &ChatEvent) -> io::Result<()> {
        match event {
            ChatEvent::MessageAppended(message) => {
                self.clear_typing()?;
                writeln!(self.out, "{}\n", format_message(message))?;
            }
            ChatEvent::TypingChanged(true) => self.show_typing()?,
            ChatEvent::TypingChanged(false) => self.clear_typing()?,
            ChatEvent::WelcomeVisible(true) => self.render_welcome()?,
            ChatEvent::WelcomeVisible(false) => {}
            ChatEvent::ConversationReset { .. } => {
                self.clear_typing()?;
                writeln!(self.out, "{}", "Started a new conversation.".cyan())?;
            }
            ChatEvent::StatusChanged(status) => {
                let was_typing = self.typing_visible;
                self.clear_typing()?;
                writeln!(self.out, "{}", format_status(*status))?;
                if was_typing {
                    self.show_typing()?;
                }
            }
            ChatEvent::RequestAbandoned(_) => {
                self.clear_typing()?;
                writeln!(self.out, "{}", "Stopped waiting for the reply.".dimmed())?;
            }
            ChatEvent::SessionRotated { .. }
            | ChatEvent::RequestFailed { .. }
            | ChatEvent::StaleResponseDiscarded(_) => {}
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChatSubscriber for TerminalRenderer<W> {
    fn on_event(&mut self, event: &ChatEvent, _state: &ChatState) {
        // Losing terminal output must not take the conversation down with it.
        let _ = self.render(event);
    }
}
