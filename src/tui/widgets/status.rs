//! Status bar widget
//!
//! Format: ` MODE  │ hints or feedback │ N turns `

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::theme::Theme;

/// Short-lived message shown in place of the key hints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Info(String),
    Error(String),
}

/// Status bar with the exchange mode and turn count
pub struct StatusBar<'a> {
    awaiting: bool,
    turn_count: usize,
    feedback: Option<&'a Feedback>,
}

impl<'a> StatusBar<'a> {
    pub fn new(awaiting: bool, turn_count: usize) -> Self {
        Self {
            awaiting,
            turn_count,
            feedback: None,
        }
    }

    pub fn feedback(mut self, feedback: Option<&'a Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    fn mode_info(&self) -> (&'static str, Color) {
        if self.awaiting {
            ("WAITING", Theme::YELLOW)
        } else {
            ("READY", Theme::GREEN)
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Theme::BG));

        let (mode_text, mode_color) = self.mode_info();
        let separator_style = Style::default().fg(Theme::MUTED);
        let hint_style = Style::default().fg(Theme::MUTED);

        let mut spans = vec![
            Span::styled(
                format!(" {} ", mode_text),
                Style::default()
                    .fg(Color::Black)
                    .bg(mode_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", separator_style),
        ];

        match self.feedback {
            Some(Feedback::Error(message)) => spans.push(Span::styled(
                format!("⚠ {}", message),
                Style::default()
                    .fg(Theme::ERROR)
                    .add_modifier(Modifier::BOLD),
            )),
            Some(Feedback::Info(message)) => {
                spans.push(Span::styled(message.clone(), Style::default().fg(Theme::GREEN)))
            }
            None => {
                let hints = [
                    ("Enter", "send"),
                    ("Shift+Enter", "newline"),
                    ("F1", "help"),
                    ("Ctrl+Q", "quit"),
                ];
                for (i, (key, action)) in hints.iter().enumerate() {
                    if i > 0 {
                        spans.push(Span::styled(" │ ", separator_style));
                    }
                    spans.push(Span::styled(format!("{}: {}", key, action), hint_style));
                }
            }
        }

        let left_width: usize = spans.iter().map(|s| s.content.width()).sum();
        let count_text = match self.turn_count {
            1 => "1 turn ".to_string(),
            n => format!("{} turns ", n),
        };
        let padding = (area.width as usize).saturating_sub(left_width + count_text.width());
        if padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::styled(count_text, hint_style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
