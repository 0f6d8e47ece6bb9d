//! Event handling for keyboard, mouse, terminal and exchange events

use std::time::Duration;

use arboard::Clipboard;
use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use crate::chat::{ChatReply, ExchangeError};

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Mouse event (scroll, move)
    Mouse(MouseEvent),
    /// Left button released
    Click { row: u16, col: u16 },
    /// Terminal resize
    Resize(u16, u16),
    /// Poll timeout
    Tick,
    /// Bracketed paste
    Paste(String),
    /// The in-flight exchange settled
    ExchangeFinished(Result<ChatReply, ExchangeError>),
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Create a handler that polls the terminal, sending a tick on every
    /// idle `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        std::thread::spawn(move || loop {
            let event = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(Event::Key(key)) => AppEvent::Key(key),
                    Ok(Event::Mouse(mouse)) => match mouse.kind {
                        MouseEventKind::Up(MouseButton::Left) => AppEvent::Click {
                            row: mouse.row,
                            col: mouse.column,
                        },
                        _ => AppEvent::Mouse(mouse),
                    },
                    Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(Event::Paste(text)) => AppEvent::Paste(text),
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::warn!("Terminal event read failed: {}", e);
                        continue;
                    }
                }
            } else {
                AppEvent::Tick
            };

            if event_tx.send(event).is_err() {
                break;
            }
        });

        Self { rx, tx }
    }

    /// Handler with no terminal polling; events only arrive through
    /// [`EventHandler::sender`].
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { rx, tx }
    }

    /// Get the sender for exchange results
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Clipboard manager for copy/paste operations
pub struct ClipboardManager {
    clipboard: Option<Clipboard>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::debug!("Clipboard unavailable: {}", e);
                None
            }
        };
        Self { clipboard }
    }

    /// Copy text to clipboard
    pub fn copy(&mut self, text: &str) -> bool {
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(text).is_ok(),
            None => false,
        }
    }

    /// Paste text from clipboard
    pub fn paste(&mut self) -> Option<String> {
        self.clipboard.as_mut()?.get_text().ok()
    }
}

impl Default for ClipboardManager {
    fn default() -> Self {
        Self::new()
    }
}
