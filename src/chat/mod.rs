mod client;
mod commands;
mod composer;
mod state;

pub use client::{probe_health, ChatSessionClient, ChatSubscriber, HealthProbe, SubmitOutcome};
pub use commands::{help_text, parse_command, ChatCommand};
pub use composer::{
    can_send, Composer, CounterLevel, CounterReading, COUNTER_CRITICAL_THRESHOLD,
    COUNTER_WARNING_THRESHOLD,
};
pub use state::{
    reduce, ChatAction, ChatEvent, ChatState, OutboundRequest, RequestLifecycle, RequestTicket,
    SendOutcome, Transition,
};
