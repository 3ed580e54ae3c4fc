mod console;
mod diagnostics;
pub mod editor;
pub mod output;

pub use console::{GatedWriter, PromptGate};
pub use diagnostics::DiagnosticLog;
pub use editor::{ComposerHelper, CounterHint};
pub use output::{
    display_diagnostic, format_message, format_status, print_error, print_info, TerminalRenderer,
};
