//! Slash commands typed at the prompt. They control the client and are never sent to the agent.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a new conversation with a fresh session id.
    New,

    /// Re-run the health probe.
    Status,

    /// Print the whole conversation again.
    History,

    /// Show the current session id.
    Session,

    /// List the example prompts.
    Examples,

    /// Send example prompt `n` (1-based).
    Example(usize),

    Help,

    Quit,

    Invalid(String),
}

/// Returns `None` when the input is an ordinary message.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "reset" | "clear" => ChatCommand::New,
        "status" => ChatCommand::Status,
        "history" => ChatCommand::History,
        "session" => ChatCommand::Session,
        "examples" => ChatCommand::Examples,
        "example" => match argument {
            Some(arg) => match arg.parse::<usize>() {
                Ok(index) if index > 0 => ChatCommand::Example(index),
                _ => ChatCommand::Invalid("/example expects a number starting at 1".to_string()),
            },
            None => ChatCommand::Examples,
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

pub fn help_text() -> &'static str {
    r#"Available commands:
  /new                   Start a new conversation
  /status                Check the connection to the agent
  /history               Show the conversation so far
  /session               Show the current session id
  /examples              List example prompts
  /example <n>           Send example prompt n
  /help                  Show this help message
  /quit                  Exit the chat
Press Ctrl+C while the agent is typing or during /status to stop waiting."#
}
