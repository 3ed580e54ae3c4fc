use crate::chat::{ChatEvent, ChatState, ChatSubscriber};
use crate::ui::output::display_diagnostic;

/// Writes request lifecycle details to stderr when verbose output is on.
pub struct DiagnosticLog {
    verbose: bool,
}

impl DiagnosticLog {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ChatSubscriber for DiagnosticLog {
    fn on_event(&mut self, event: &ChatEvent, state: &ChatState) {
        if !self.verbose {
            return;
        }

        let line = match event {
            ChatEvent::TypingChanged(true) => {
                format!("Sending message (session {})", state.session_id())
            }
            ChatEvent::SessionRotated { from, to } => {
                format!("Server rotated session {} -> {}", from, to)
            }
            ChatEvent::RequestFailed { ticket, error } => {
                format!("Error sending message #{}: {}", ticket.id(), error)
            }
            ChatEvent::RequestAbandoned(ticket) => {
                format!("Abandoned request #{} ({})", ticket.id(), ticket.session_id())
            }
            ChatEvent::StaleResponseDiscarded(ticket) => format!(
                "Discarded late reply for request #{} from session {}",
                ticket.id(),
                ticket.session_id()
            ),
            ChatEvent::ConversationReset { session_id } => {
                format!("Started new conversation with session ID: {}", session_id)
            }
            _ => return,
        };

        display_diagnostic(true, &line);
    }
}
