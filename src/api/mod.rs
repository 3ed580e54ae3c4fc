pub mod client;
pub mod models;

pub use client::{AgentApi, HttpAgentClient};
pub use models::{ChatRequest, ChatResponse};
