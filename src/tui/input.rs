//! Message input field
//!
//! Wraps a multi-line `TextArea` with the chat's submit rules: Enter
//! submits, Shift+Enter (or Alt+Enter) inserts a newline, blank text never
//! submits, and nothing is editable while a reply is awaited.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::style::{Modifier, Style};
use tui_textarea::{CursorMove, Input, TextArea};

use super::theme::Theme;

pub const PLACEHOLDER_READY: &str = "Type your message...";
pub const PLACEHOLDER_WAITING: &str = "Waiting for response...";

/// What a key press means to the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Submit,
    Newline,
    Edit,
    Ignore,
}

/// Map a key event to an intent.
///
/// Alt+Enter is accepted as a newline because many terminals cannot
/// report Shift+Enter without keyboard enhancement.
pub fn classify_key(key: &KeyEvent, disabled: bool) -> KeyIntent {
    if key.kind == KeyEventKind::Release || disabled {
        return KeyIntent::Ignore;
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char('\n')
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            KeyIntent::Newline
        }
        KeyCode::Enter | KeyCode::Char('\n') => KeyIntent::Submit,
        _ => KeyIntent::Edit,
    }
}

/// The chat's text input.
pub struct InputBox {
    area: TextArea<'static>,
    disabled: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            area: Self::build_area(false),
            disabled: false,
        }
    }

    fn build_area(disabled: bool) -> TextArea<'static> {
        let mut area = TextArea::default();
        area.set_cursor_line_style(Style::default());
        area.set_style(Style::default().fg(Theme::TEXT).bg(Theme::INPUT_BG));
        area.set_placeholder_style(Style::default().fg(Theme::MUTED));
        Self::apply_mode(&mut area, disabled);
        area.move_cursor(CursorMove::End);
        area
    }

    fn apply_mode(area: &mut TextArea<'static>, disabled: bool) {
        if disabled {
            area.set_placeholder_text(PLACEHOLDER_WAITING);
            area.set_cursor_style(Style::default());
        } else {
            area.set_placeholder_text(PLACEHOLDER_READY);
            area.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }

    /// Raw text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.area.lines().join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.area.lines().iter().all(|line| line.trim().is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.area.lines().len()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled != disabled {
            self.disabled = disabled;
            Self::apply_mode(&mut self.area, disabled);
        }
    }

    /// Insert pasted text at the cursor.
    ///
    /// Terminals deliver pasted line breaks as `\r\n` or a lone `\r`; both
    /// become `\n`.
    pub fn insert_str(&mut self, text: &str) -> bool {
        if self.disabled {
            return false;
        }
        self.area
            .insert_str(text.replace("\r\n", "\n").replace('\r', "\n"))
    }

    /// Apply a key press; returns the submitted text when it triggered a
    /// submit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<String> {
        match classify_key(&key, self.disabled) {
            KeyIntent::Submit => self.submit(),
            KeyIntent::Newline => {
                self.area.insert_newline();
                None
            }
            KeyIntent::Edit => {
                self.area.input(Input::from(key));
                None
            }
            KeyIntent::Ignore => None,
        }
    }

    /// The send action: take the text and clear the field.
    ///
    /// Leaves the field untouched and returns `None` when the text is
    /// blank or the field is disabled.
    pub fn submit(&mut self) -> Option<String> {
        if self.disabled || self.is_blank() {
            return None;
        }
        let text = self.text();
        self.area = Self::build_area(self.disabled);
        Some(text)
    }

    /// The underlying widget, for rendering.
    pub fn widget(&self) -> &TextArea<'static> {
        &self.area
    }
}
