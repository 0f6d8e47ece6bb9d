//! Main TUI application state and logic

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags, MouseEvent,
        MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::event::{AppEvent, ClipboardManager, EventHandler};
use super::hit_test::{ClickTarget, HitTestRegistry};
use super::input::InputBox;
use super::ui;
use super::widgets::{Feedback, MessageListState};
use crate::chat::{run_exchange, ChatBackend, ChatReply, ChatRequest, ChatState, ExchangeError};

/// How long status bar feedback stays visible
const FEEDBACK_TTL: Duration = Duration::from_secs(2);
/// Rows moved per mouse wheel notch
const WHEEL_SCROLL: usize = 3;

/// Something the view wants done outside itself
#[derive(Debug, PartialEq, Eq)]
pub enum ViewAction {
    Quit,
    /// Start an exchange
    Send(ChatRequest),
    CopyLastReply,
    Paste,
}

/// Everything the UI draws, separate from the terminal that draws it
pub struct ChatView {
    pub state: ChatState,
    pub input: InputBox,
    pub list_state: MessageListState,
    pub hit_registry: HitTestRegistry,
    pub show_help: bool,
    /// Status bar feedback with the time it was set
    pub feedback: Option<(Instant, Feedback)>,
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            state: ChatState::new(),
            input: InputBox::new(),
            list_state: MessageListState::default(),
            hit_registry: HitTestRegistry::new(),
            show_help: false,
            feedback: None,
        }
    }

    /// Apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ViewAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(ViewAction::Quit),
            (_, KeyCode::F(1)) => {
                self.show_help = !self.show_help;
                return None;
            }
            (_, KeyCode::Esc) => {
                self.show_help = false;
                return None;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('v')) => return Some(ViewAction::Paste),
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => return Some(ViewAction::CopyLastReply),
            (_, KeyCode::PageUp) => {
                let page = self.list_state.viewport_height.max(1);
                self.list_state.scroll_up(page);
                return None;
            }
            (_, KeyCode::PageDown) => {
                let page = self.list_state.viewport_height.max(1);
                self.list_state.scroll_down(page);
                return None;
            }
            (KeyModifiers::CONTROL, KeyCode::Up) => {
                self.list_state.scroll_up(1);
                return None;
            }
            // The cursor keys belong to the input unless it is locked
            (KeyModifiers::NONE, KeyCode::Up) if self.input.is_disabled() => {
                self.list_state.scroll_up(1);
                return None;
            }
            (KeyModifiers::NONE, KeyCode::Down) if self.input.is_disabled() => {
                self.list_state.scroll_down(1);
                return None;
            }
            (KeyModifiers::CONTROL, KeyCode::Down) => {
                self.list_state.scroll_down(1);
                return None;
            }
            _ => {}
        }

        let text = self.input.handle_key(key)?;
        self.submit_text(&text).map(ViewAction::Send)
    }

    /// Apply a left click at a screen position.
    pub fn handle_click(&mut self, col: u16, row: u16) -> Option<ViewAction> {
        match self.hit_registry.hit_test(col, row) {
            Some(ClickTarget::SendButton) => self.submit_from_input().map(ViewAction::Send),
            Some(ClickTarget::Input) | None => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.list_state.scroll_up(WHEEL_SCROLL),
            MouseEventKind::ScrollDown => self.list_state.scroll_down(WHEEL_SCROLL),
            _ => {}
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if !self.input.insert_str(text) {
            debug!("Paste ignored while awaiting a reply");
        }
    }

    /// The send button path: submit whatever is in the input field.
    pub fn submit_from_input(&mut self) -> Option<ChatRequest> {
        if self.state.is_awaiting() {
            return None;
        }
        let text = self.input.submit()?;
        self.submit_text(&text)
    }

    /// Record a user turn for `text` and lock the input.
    ///
    /// Returns the request to send, or `None` when `text` is blank.
    pub fn submit_text(&mut self, text: &str) -> Option<ChatRequest> {
        let request = self.state.begin_submit(text)?;
        self.input.set_disabled(true);
        self.list_state.scroll_to_bottom();
        info!(
            history = request.history.len(),
            "Submitting message ({} chars)",
            request.chat.len()
        );
        Some(request)
    }

    /// Record an exchange outcome and unlock the input.
    pub fn finish_exchange(&mut self, outcome: Result<ChatReply, ExchangeError>) {
        let turn = self.state.finish_exchange(outcome);
        debug!("Appended {} turn ({} chars)", turn.role(), turn.text().len());
        self.input.set_disabled(false);
        self.list_state.scroll_to_bottom();
    }

    pub fn set_feedback(&mut self, feedback: Feedback) {
        self.feedback = Some((Instant::now(), feedback));
    }

    /// Drop feedback older than the display time.
    pub fn expire_feedback(&mut self, now: Instant) {
        if let Some((set_at, _)) = &self.feedback {
            if now.duration_since(*set_at) >= FEEDBACK_TTL {
                self.feedback = None;
            }
        }
    }
}

/// Run one exchange in the background and report the outcome on `tx`.
///
/// The call runs in its own task so a panicking backend still produces
/// an `ExchangeFinished` event and the input is unlocked.
pub fn spawn_exchange(
    backend: Arc<dyn ChatBackend>,
    request: ChatRequest,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let call = tokio::spawn(async move { run_exchange(backend.as_ref(), &request).await });
        let outcome = match call.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Exchange task failed: {}", e);
                Err(ExchangeError::Interrupted(e.to_string()))
            }
        };
        if tx.send(AppEvent::ExchangeFinished(outcome)).is_err() {
            debug!("UI gone before exchange finished");
        }
    });
}

/// Main TUI application
pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Optional so the run loop can take it
    events: Option<EventHandler>,
    view: ChatView,
    backend: Arc<dyn ChatBackend>,
    clipboard: ClipboardManager,
    should_quit: bool,
}

impl TuiApp {
    /// Take over the terminal.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste
        )?;

        // Shift+Enter is only reported with the kitty keyboard protocol;
        // without it Alt+Enter is the newline chord
        if crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false) {
            let _ = execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            );
        }

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            events: Some(EventHandler::new(Duration::from_millis(100))),
            view: ChatView::new(),
            backend,
            clipboard: ClipboardManager::new(),
            should_quit: false,
        })
    }

    /// Run the main event loop
    pub async fn run(&mut self) -> Result<()> {
        let mut events = self.events.take().context("Event handler already taken")?;
        let tx = events.sender();
        let mut revisions = self.view.state.subscribe();

        while !self.should_quit {
            self.view.expire_feedback(Instant::now());
            revisions.borrow_and_update();
            self.terminal
                .draw(|frame| ui::render(frame, &mut self.view))?;

            tokio::select! {
                Ok(()) = revisions.changed() => {}
                maybe_event = events.next() => match maybe_event {
                    Some(event) => self.handle_event(event, &tx),
                    None => break,
                },
            }
        }

        self.events = Some(events);
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent, tx: &mpsc::UnboundedSender<AppEvent>) {
        let action = match event {
            AppEvent::Key(key) => self.view.handle_key(key),
            AppEvent::Click { row, col } => self.view.handle_click(col, row),
            AppEvent::Mouse(mouse) => {
                self.view.handle_mouse(mouse);
                None
            }
            AppEvent::Paste(text) => {
                self.view.handle_paste(&text);
                None
            }
            AppEvent::ExchangeFinished(outcome) => {
                self.view.finish_exchange(outcome);
                None
            }
            AppEvent::Resize(..) | AppEvent::Tick => None,
        };

        if let Some(action) = action {
            self.apply(action, tx);
        }
    }

    fn apply(&mut self, action: ViewAction, tx: &mpsc::UnboundedSender<AppEvent>) {
        match action {
            ViewAction::Quit => self.should_quit = true,
            ViewAction::Send(request) => {
                spawn_exchange(Arc::clone(&self.backend), request, tx.clone());
            }
            ViewAction::Paste => match self.clipboard.paste() {
                Some(text) => self.view.handle_paste(&text),
                None => self
                    .view
                    .set_feedback(Feedback::Error("Clipboard unavailable".to_string())),
            },
            ViewAction::CopyLastReply => {
                let feedback = match self.view.state.last_model_text() {
                    Some(text) if self.clipboard.copy(text) => {
                        Feedback::Info("Copied last reply".to_string())
                    }
                    Some(_) => Feedback::Error("Clipboard unavailable".to_string()),
                    None => Feedback::Info("No reply to copy yet".to_string()),
                };
                self.view.set_feedback(feedback);
            }
        }
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        // Reverse order of setup
        let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        let _ = self.terminal.show_cursor();
    }
}
