//! UI-independent chat core: turns, conversation state and the remote
//! exchange.

pub mod client;
pub mod state;
pub mod turn;
pub mod wire;

pub use client::{run_exchange, ChatBackend, ClientError, ExchangeError, HttpChatClient};
pub use state::ChatState;
pub use turn::{Role, Turn, FALLBACK_REPLY};
pub use wire::{ChatReply, ChatRequest};
