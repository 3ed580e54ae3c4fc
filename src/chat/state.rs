use crate::api::{ChatRequest, ChatResponse};
use crate::models::{ConnectionStatus, Message, SessionId};
use std::sync::Arc;

/// Identifies the one request allowed in flight, and the session it was sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    id: u64,
    session_id: SessionId,
}

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestLifecycle {
    #[default]
    Idle,
    Pending(RequestTicket),
}

/// A message the state machine wants sent to the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub ticket: RequestTicket,
    pub payload: ChatRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Replied(ChatResponse),
    /// The error text only reaches diagnostics, never the log.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    Submit(String),
    Settle {
        ticket: RequestTicket,
        outcome: SendOutcome,
    },
    Abandon,
    NewConversation,
    SetStatus(ConnectionStatus),
}

/// Notifications for render subscribers, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    MessageAppended(Message),
    TypingChanged(bool),
    WelcomeVisible(bool),
    ConversationReset { session_id: SessionId },
    SessionRotated { from: SessionId, to: SessionId },
    StatusChanged(ConnectionStatus),
    RequestFailed { ticket: RequestTicket, error: String },
    RequestAbandoned(RequestTicket),
    StaleResponseDiscarded(RequestTicket),
}

#[derive(Debug, Clone)]
pub struct ChatState {
    session_id: SessionId,
    log: Arc<Vec<Message>>,
    lifecycle: RequestLifecycle,
    status: ConnectionStatus,
    next_ticket: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::with_session(SessionId::generate())
    }

    pub fn with_session(session_id: SessionId) -> Self {
        Self {
            session_id,
            log: Arc::new(Vec::new()),
            lifecycle: RequestLifecycle::Idle,
            status: ConnectionStatus::default(),
            next_ticket: 1,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Snapshot of the log. Later updates never change a snapshot already handed out.
    pub fn log(&self) -> Arc<Vec<Message>> {
        Arc::clone(&self.log)
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    pub fn is_typing(&self) -> bool {
        matches!(self.lifecycle, RequestLifecycle::Pending(_))
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn welcome_visible(&self) -> bool {
        self.log.is_empty()
    }

    fn append(&mut self, message: Message) {
        Arc::make_mut(&mut self.log).push(message);
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: ChatState,
    pub events: Vec<ChatEvent>,
    pub request: Option<OutboundRequest>,
}

impl Transition {
    fn unchanged(state: &ChatState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            request: None,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.events.is_empty() && self.request.is_none()
    }
}

/// Compute the next state for `action`. Never touches I/O.
pub fn reduce(state: &ChatState, action: ChatAction) -> Transition {
    match action {
        ChatAction::Submit(text) => submit(state, &text),
        ChatAction::Settle { ticket, outcome } => settle(state, ticket, outcome),
        ChatAction::Abandon => abandon(state),
        ChatAction::NewConversation => new_conversation(state),
        ChatAction::SetStatus(status) => {
            if status == state.status {
                return Transition::unchanged(state);
            }
            let mut next = state.clone();
            next.status = status;
            Transition {
                state: next,
                events: vec![ChatEvent::StatusChanged(status)],
                request: None,
            }
        }
    }
}

fn submit(state: &ChatState, text: &str) -> Transition {
    let message = text.trim();
    if message.is_empty() || state.is_typing() {
        return Transition::unchanged(state);
    }

    let mut next = state.clone();
    let mut events = Vec::with_capacity(3);
    if next.welcome_visible() {
        events.push(ChatEvent::WelcomeVisible(false));
    }

    let user = Message::user(message);
    next.append(user.clone());
    events.push(ChatEvent::MessageAppended(user));

    let ticket = RequestTicket {
        id: next.next_ticket,
        session_id: next.session_id.clone(),
    };
    next.next_ticket += 1;
    next.lifecycle = RequestLifecycle::Pending(ticket.clone());
    events.push(ChatEvent::TypingChanged(true));

    let payload = ChatRequest {
        message: message.to_string(),
        session_id: next.session_id.to_string(),
    };

    Transition {
        state: next,
        events,
        request: Some(OutboundRequest { ticket, payload }),
    }
}

fn settle(state: &ChatState, ticket: RequestTicket, outcome: SendOutcome) -> Transition {
    if state.lifecycle != RequestLifecycle::Pending(ticket.clone()) {
        let mut transition = Transition::unchanged(state);
        transition
            .events
            .push(ChatEvent::StaleResponseDiscarded(ticket));
        return transition;
    }

    let mut next = state.clone();
    let mut events = Vec::with_capacity(3);
    next.lifecycle = RequestLifecycle::Idle;

    match outcome {
        SendOutcome::Replied(response) => {
            let reply = Message::assistant(response.response.as_str());
            next.append(reply.clone());
            events.push(ChatEvent::MessageAppended(reply));

            if let Some(rotated) = response.rotated_session_id() {
                if rotated != next.session_id.as_str() {
                    let from = std::mem::replace(&mut next.session_id, SessionId::from(rotated));
                    events.push(ChatEvent::SessionRotated {
                        from,
                        to: next.session_id.clone(),
                    });
                }
            }
        }
        SendOutcome::Failed(error) => {
            events.push(ChatEvent::RequestFailed {
                ticket: ticket.clone(),
                error,
            });
            let apology = Message::error();
            next.append(apology.clone());
            events.push(ChatEvent::MessageAppended(apology));
        }
    }

    events.push(ChatEvent::TypingChanged(false));
    Transition {
        state: next,
        events,
        request: None,
    }
}

fn abandon(state: &ChatState) -> Transition {
    let RequestLifecycle::Pending(ticket) = &state.lifecycle else {
        return Transition::unchanged(state);
    };

    let mut next = state.clone();
    let events = vec![
        ChatEvent::RequestAbandoned(ticket.clone()),
        ChatEvent::TypingChanged(false),
    ];
    next.lifecycle = RequestLifecycle::Idle;
    Transition {
        state: next,
        events,
        request: None,
    }
}

fn new_conversation(state: &ChatState) -> Transition {
    let mut next = state.clone();
    let mut events = Vec::with_capacity(4);

    if let RequestLifecycle::Pending(ticket) = &state.lifecycle {
        events.push(ChatEvent::RequestAbandoned(ticket.clone()));
        events.push(ChatEvent::TypingChanged(false));
    }

    next.session_id = SessionId::generate_after(&state.session_id);
    next.log = Arc::new(Vec::new());
    next.lifecycle = RequestLifecycle::Idle;

    events.push(ChatEvent::ConversationReset {
        session_id: next.session_id.clone(),
    });
    events.push(ChatEvent::WelcomeVisible(true));

    Transition {
        state: next,
        events,
        request: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_ticket(state: &ChatState) -> RequestTicket {
        match state.lifecycle() {
            RequestLifecycle::Pending(ticket) => ticket.clone(),
            RequestLifecycle::Idle => panic!("expected a pending request"),
        }
    }

    #[test]
    fn test_first_submit_hides_welcome() {
        let state = ChatState::with_session(SessionId::from("s1"));
        let transition = reduce(&state, ChatAction::Submit("Hello".into()));
        assert_eq!(transition.events[0], ChatEvent::WelcomeVisible(false));
        assert!(!transition.state.welcome_visible());
    }

    #[test]
    fn test_ticket_ids_increase() {
        let state = ChatState::with_session(SessionId::from("s1"));
        let first = reduce(&state, ChatAction::Submit("one".into())).state;
        let first_ticket = pending_ticket(&first);
        let idle = reduce(
            &first,
            ChatAction::Settle {
                ticket: first_ticket.clone(),
                outcome: SendOutcome::Failed("boom".into()),
            },
        )
        .state;
        let second = reduce(&idle, ChatAction::Submit("two".into())).state;
        assert!(pending_ticket(&second).id() > first_ticket.id());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_updates() {
        let state = ChatState::with_session(SessionId::from("s1"));
        let after_submit = reduce(&state, ChatAction::Submit("Hello".into())).state;
        let snapshot = after_submit.log();
        let ticket = pending_ticket(&after_submit);
        let after_reply = reduce(
            &after_submit,
            ChatAction::Settle {
                ticket,
                outcome: SendOutcome::Replied(ChatResponse {
                    response: "Hi".into(),
                    session_id: None,
                }),
            },
        )
        .state;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(after_reply.messages().len(), 2);
    }

    #[test]
    fn test_empty_rotated_session_id_is_ignored() {
        let state = ChatState::with_session(SessionId::from("s1"));
        let pending = reduce(&state, ChatAction::Submit("Hello".into())).state;
        let ticket = pending_ticket(&pending);
        let transition = reduce(
            &pending,
            ChatAction::Settle {
                ticket,
                outcome: SendOutcome::Replied(ChatResponse {
                    response: "Hi".into(),
                    session_id: Some(String::new()),
                }),
            },
        );
        assert_eq!(transition.state.session_id().as_str(), "s1");
        assert!(!transition
            .events
            .iter()
            .any(|e| matches!(e, ChatEvent::SessionRotated { .. })));
    }

    #[test]
    fn test_status_change_is_reported_once() {
        let state = ChatState::with_session(SessionId::from("s1"));
        let connected = reduce(&state, ChatAction::SetStatus(ConnectionStatus::Connected));
        assert_eq!(
            connected.events,
            vec![ChatEvent::StatusChanged(ConnectionStatus::Connected)]
        );
        let again = reduce(
            &connected.state,
            ChatAction::SetStatus(ConnectionStatus::Connected),
        );
        assert!(again.is_noop());
    }
}
