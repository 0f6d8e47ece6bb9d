//! Terminal chat interface
//!
//! A header, a scrolling list of message bubbles, a status bar and a
//! multi-line input with a send button.

mod app;
mod event;
mod theme;
mod ui;

pub mod hit_test;
pub mod input;
pub mod markdown;
pub mod widgets;

pub use app::{spawn_exchange, ChatView, TuiApp, ViewAction};
pub use event::{AppEvent, EventHandler};

use std::sync::Arc;

use anyhow::Result;

use crate::chat::HttpChatClient;
use crate::config::ChatConfig;

/// Run the TUI against the configured endpoint
pub async fn run(config: ChatConfig) -> Result<()> {
    let client = HttpChatClient::new(&config)?;
    tracing::info!("Chat endpoint: {}", client.endpoint());

    let mut app = TuiApp::new(Arc::new(client))?;
    app.run().await
}
