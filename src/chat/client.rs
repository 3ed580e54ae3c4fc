use crate::api::{AgentApi, ChatResponse};
use crate::chat::composer::Composer;
use crate::chat::state::{
    reduce, ChatAction, ChatEvent, ChatState, OutboundRequest, RequestLifecycle, RequestTicket,
    SendOutcome,
};
use crate::error::Result;
use crate::models::{ConnectionStatus, SessionId};
use crate::ui::display_diagnostic;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Receives every state change right after it is applied.
pub trait ChatSubscriber: Send {
    fn on_event(&mut self, event: &ChatEvent, state: &ChatState);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input or a request already in flight; nothing happened.
    Ignored,
    Replied,
    Failed,
    /// The request settled after the conversation moved on.
    Discarded,
}

pub struct ChatSessionClient {
    state: ChatState,
    composer: Composer,
    agent: Arc<dyn AgentApi>,
    subscribers: Vec<Box<dyn ChatSubscriber>>,
}

impl ChatSessionClient {
    pub fn new(agent: Arc<dyn AgentApi>) -> Self {
        Self::with_state(agent, ChatState::new())
    }

    pub fn with_state(agent: Arc<dyn AgentApi>, state: ChatState) -> Self {
        Self {
            state,
            composer: Composer::new(),
            agent,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn ChatSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn session_id(&self) -> &SessionId {
        self.state.session_id()
    }

    pub fn is_typing(&self) -> bool {
        self.state.is_typing()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state.status()
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn agent(&self) -> Arc<dyn AgentApi> {
        Arc::clone(&self.agent)
    }

    fn apply(&mut self, action: ChatAction) -> Option<OutboundRequest> {
        let transition = reduce(&self.state, action);
        self.state = transition.state;
        for event in &transition.events {
            for subscriber in self.subscribers.iter_mut() {
                subscriber.on_event(event, &self.state);
            }
        }
        transition.request
    }

    /// Record the user's message and hand back the request to send, if any.
    pub fn begin_submit(&mut self, text: &str) -> Option<OutboundRequest> {
        let request = self.apply(ChatAction::Submit(text.to_string()));
        if request.is_some() {
            self.composer.clear();
        }
        request
    }

    /// Fold the result of a request started by `begin_submit` back into the log.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<ChatResponse>,
    ) -> SubmitOutcome {
        let current = matches!(
            self.state.lifecycle(),
            RequestLifecycle::Pending(pending) if *pending == ticket
        );

        let outcome = match result {
            Ok(response) => SendOutcome::Replied(response),
            Err(e) => SendOutcome::Failed(e.to_string()),
        };
        let replied = matches!(outcome, SendOutcome::Replied(_));
        self.apply(ChatAction::Settle { ticket, outcome });

        match (current, replied) {
            (false, _) => SubmitOutcome::Discarded,
            (true, true) => SubmitOutcome::Replied,
            (true, false) => SubmitOutcome::Failed,
        }
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let Some(request) = self.begin_submit(text) else {
            return SubmitOutcome::Ignored;
        };
        let agent = Arc::clone(&self.agent);
        let result = agent.send_message(&request.payload).await;
        self.complete(request.ticket, result)
    }

    /// Submit whatever is in the composer.
    pub async fn submit_input(&mut self) -> SubmitOutcome {
        let text = self.composer.text().to_string();
        self.submit(&text).await
    }

    /// Stop waiting for the in-flight request. Its result, if it ever arrives, is dropped.
    pub fn abandon_pending(&mut self) -> bool {
        let was_typing = self.is_typing();
        self.apply(ChatAction::Abandon);
        was_typing
    }

    pub fn start_new_conversation(&mut self) {
        self.apply(ChatAction::NewConversation);
        self.composer.clear();
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.apply(ChatAction::SetStatus(status));
    }

    pub async fn check_connectivity(&mut self, verbose: bool) -> ConnectionStatus {
        self.set_status(ConnectionStatus::Connecting);
        let status = probe_health(self.agent.as_ref(), verbose).await;
        self.set_status(status);
        status
    }

    /// Like `check_connectivity`, but gives up when `cancel` resolves first and
    /// puts the previous status back.
    pub async fn check_connectivity_until<C: Future>(
        &mut self,
        verbose: bool,
        cancel: C,
    ) -> Option<ConnectionStatus> {
        let previous = self.status();
        let checked = tokio::select! {
            status = self.check_connectivity(verbose) => Some(status),
            _ = cancel => None,
        };
        if checked.is_none() {
            self.set_status(previous);
        }
        checked
    }

    /// Wait for `input`, folding in the background health result if it lands first.
    pub async fn wait_with_probe<F: Future>(
        &mut self,
        probe: &mut HealthProbe,
        input: F,
    ) -> F::Output {
        tokio::pin!(input);
        loop {
            tokio::select! {
                output = &mut input => return output,
                status = probe.finished() => self.set_status(status),
            }
        }
    }
}

/// Health probe running in the background.
#[derive(Default)]
pub struct HealthProbe {
    handle: Option<JoinHandle<ConnectionStatus>>,
}

impl HealthProbe {
    pub fn spawn(agent: Arc<dyn AgentApi>, verbose: bool) -> Self {
        Self {
            handle: Some(tokio::spawn(async move {
                probe_health(agent.as_ref(), verbose).await
            })),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Resolves once with the probe result, then never again.
    pub async fn finished(&mut self) -> ConnectionStatus {
        let Some(handle) = self.handle.as_mut() else {
            return futures::future::pending().await;
        };
        let status = handle.await.unwrap_or(ConnectionStatus::Error);
        self.handle = None;
        status
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Hit the health endpoint once. Failures only change the reported status.
pub async fn probe_health(agent: &dyn AgentApi, verbose: bool) -> ConnectionStatus {
    match agent.health().await {
        Ok(payload) => {
            display_diagnostic(verbose, &format!("Health check: {}", payload));
            ConnectionStatus::Connected
        }
        Err(e) => {
            display_diagnostic(verbose, &format!("Health check failed: {}", e));
            ConnectionStatus::Error
        }
    }
}
