mod message;
mod session;
mod status;

pub use message::{Message, Sender, ERROR_REPLY};
pub use session::SessionId;
pub use status::ConnectionStatus;
