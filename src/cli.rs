use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "pm-chat")]
#[command(about = "Chat with the product management agent from your terminal", long_about = None)]
pub struct Args {
    #[arg(
        short = 'e',
        long = "endpoint",
        help = "Agent service base URL (e.g., http://localhost:8000)"
    )]
    pub endpoint: Option<String>,

    #[arg(long = "timeout", help = "Give up on a reply after this many seconds")]
    pub timeout: Option<u64>,

    #[arg(short = 'c', long = "config", help = "Read settings from this config file")]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostics to stderr")]
    pub verbose: bool,

    #[arg(long = "no-health-check", help = "Skip the startup connectivity check")]
    pub no_health_check: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,

    #[arg(
        long = "config-init",
        help = "Write an example config file to ~/.config/pm-chat/pm-chat.yaml"
    )]
    pub config_init: bool,

    #[arg(help = "Send this message first, then stay in the chat")]
    pub message: Vec<String>,
}

impl Args {
    /// The message given on the command line, if any.
    pub fn initial_message(&self) -> Option<String> {
        let joined = self.message.join(" ");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}
