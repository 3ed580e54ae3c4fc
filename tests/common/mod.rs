#![allow(dead_code)]

use async_trait::async_trait;
use pm_chat::api::{AgentApi, ChatRequest, ChatResponse};
use pm_chat::chat::{ChatEvent, ChatState, ChatSubscriber};
use pm_chat::error::{ChatError, Result};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Scripted {
    Reply(&'static str, Option<&'static str>),
    Status(u16),
    Network,
}

/// In-memory agent that answers from a script and records what it was sent.
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Scripted>>,
    healthy: bool,
    health_delay: Option<Duration>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedAgent {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            healthy: true,
            health_delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Healthy, but `/health` takes `delay` to answer.
    pub fn slow_health(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            healthy: true,
            health_delay: Some(delay),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn unhealthy() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            healthy: false,
            health_delay: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AgentApi for ScriptedAgent {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(text, session_id)) => Ok(ChatResponse {
                response: text.to_string(),
                session_id: session_id.map(str::to_string),
            }),
            Some(Scripted::Status(status)) => Err(ChatError::ApiError {
                status,
                message: "Internal Server Error".to_string(),
            }),
            Some(Scripted::Network) | None => {
                Err(ChatError::Other("connection refused".to_string()))
            }
        }
    }

    async fn health(&self) -> Result<Value> {
        if let Some(delay) = self.health_delay {
            tokio::time::sleep(delay).await;
        }
        if self.healthy {
            Ok(json!({"status": "healthy"}))
        } else {
            Err(ChatError::Other("connection refused".to_string()))
        }
    }
}

/// Subscriber that keeps every event it sees.
#[derive(Clone, Default)]
pub struct EventRecorder {
    pub events: Arc<Mutex<Vec<ChatEvent>>>,
}

impl EventRecorder {
    pub fn snapshot(&self) -> Vec<ChatEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ChatSubscriber for EventRecorder {
    fn on_event(&mut self, event: &ChatEvent, _state: &ChatState) {
        self.events.lock().unwrap().push(event.clone());
    }
}
