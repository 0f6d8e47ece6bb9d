//! Message list widget with markdown-rendered bubbles

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::StatefulWidget,
};

use crate::chat::{Role, Turn};
use crate::tui::markdown::{render_markdown, wrap_lines};
use crate::tui::theme::Theme;

pub const WAITING_TEXT: &str = "● Waiting for response...";

/// Bubbles take at most this share of the list width
const BUBBLE_WIDTH_PERCENT: usize = 80;
/// Columns of padding on each side of bubble text
const BUBBLE_PADDING: usize = 1;

/// State for the message list
#[derive(Debug)]
pub struct MessageListState {
    /// Current scroll offset (in rows)
    pub offset: usize,
    /// Total content height (in rows)
    pub content_height: usize,
    /// Viewport height
    pub viewport_height: usize,
    /// Follow new content until the user scrolls up
    pub stick_to_bottom: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: 0,
            stick_to_bottom: true,
        }
    }
}

impl MessageListState {
    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
        self.stick_to_bottom = self.offset >= self.max_offset();
    }

    pub fn scroll_down(&mut self, amount: usize) {
        self.offset = (self.offset + amount).min(self.max_offset());
        self.stick_to_bottom = self.offset >= self.max_offset();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
        self.stick_to_bottom = true;
    }
}

/// One laid-out row of the list.
struct Row {
    line: Line<'static>,
    x: usize,
    width: usize,
    bg: Option<ratatui::style::Color>,
}

/// Widget for rendering the conversation
pub struct MessageList<'a> {
    turns: &'a [Turn],
    awaiting: bool,
}

impl<'a> MessageList<'a> {
    pub fn new(turns: &'a [Turn]) -> Self {
        Self {
            turns,
            awaiting: false,
        }
    }

    pub fn awaiting(mut self, awaiting: bool) -> Self {
        self.awaiting = awaiting;
        self
    }

    /// Lay out every row for a list `width` columns wide.
    fn layout(&self, width: usize) -> Vec<Row> {
        let mut rows = Vec::new();
        let max_bubble = (width * BUBBLE_WIDTH_PERCENT / 100).max(1);
        let max_text = max_bubble.saturating_sub(BUBBLE_PADDING * 2).max(1);

        for (i, turn) in self.turns.iter().enumerate() {
            if i > 0 {
                rows.push(Row {
                    line: Line::default(),
                    x: 0,
                    width: 0,
                    bg: None,
                });
            }

            let (bg, fg) = match turn.role() {
                Role::User => (Theme::USER_BUBBLE, Theme::USER_TEXT),
                Role::Model => (Theme::MODEL_BUBBLE, Theme::TEXT),
            };
            let base = Style::default().fg(fg).bg(bg);
            let lines = wrap_lines(&render_markdown(turn.text(), base), max_text);

            let text_width = lines.iter().map(Line::width).max().unwrap_or(0);
            let bubble_width = (text_width + BUBBLE_PADDING * 2).min(width);
            let x = match turn.role() {
                Role::User => width.saturating_sub(bubble_width),
                Role::Model => 0,
            };

            for line in lines {
                rows.push(Row {
                    line,
                    x,
                    width: bubble_width,
                    bg: Some(bg),
                });
            }
        }

        if self.awaiting {
            if !rows.is_empty() {
                rows.push(Row {
                    line: Line::default(),
                    x: 0,
                    width: 0,
                    bg: None,
                });
            }
            rows.push(Row {
                line: Line::from(Span::styled(
                    WAITING_TEXT,
                    Style::default()
                        .fg(Theme::MUTED)
                        .add_modifier(Modifier::ITALIC),
                )),
                x: 0,
                width,
                bg: None,
            });
        }

        rows
    }
}

impl StatefulWidget for MessageList<'_> {
    type State = MessageListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let rows = self.layout(area.width as usize);

        state.content_height = rows.len();
        state.viewport_height = area.height as usize;
        if state.stick_to_bottom {
            state.offset = state.max_offset();
        } else {
            state.offset = state.offset.min(state.max_offset());
        }

        for (virtual_y, row) in rows.iter().enumerate().skip(state.offset) {
            let screen_y = virtual_y - state.offset;
            if screen_y >= area.height as usize {
                break;
            }
            let y = area.y + screen_y as u16;
            let x = area.x + row.x as u16;

            if let Some(bg) = row.bg {
                let fill = Rect::new(x, y, row.width as u16, 1).intersection(area);
                buf.set_style(fill, Style::default().bg(bg));
                let text_x = x + BUBBLE_PADDING as u16;
                let text_width = (row.width.saturating_sub(BUBBLE_PADDING)) as u16;
                buf.set_line(text_x, y, &row.line, text_width);
            } else {
                buf.set_line(x, y, &row.line, row.width as u16);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::markdown::line_text;

    fn render(turns: &[Turn], awaiting: bool, width: u16, height: u16) -> (Buffer, MessageListState) {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        let mut state = MessageListState::default();
        MessageList::new(turns)
            .awaiting(awaiting)
            .render(area, &mut buf, &mut state);
        (buf, state)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_user_bubble_is_right_aligned() {
        let turns = vec![Turn::user("Hi")];
        let (buf, state) = render(&turns, false, 20, 5);

        assert_eq!(state.content_height, 1);
        // "Hi" plus one column of padding each side ends at the right edge
        assert_eq!(row_text(&buf, 0), format!("{}Hi ", " ".repeat(17)));
        assert_eq!(buf[(19, 0)].bg, Theme::USER_BUBBLE);
        assert_eq!(buf[(16, 0)].bg, Theme::USER_BUBBLE);
        assert_ne!(buf[(15, 0)].bg, Theme::USER_BUBBLE);
    }

    #[test]
    fn test_user_bubble_renders_markdown() {
        let turns = vec![Turn::user("**bold** and `code`")];
        let (buf, state) = render(&turns, false, 30, 3);

        assert_eq!(state.content_height, 1);
        let row = row_text(&buf, 0);
        // 13 columns of text plus padding, flush with the right edge
        assert_eq!(row, format!("{}bold and code ", " ".repeat(16)));
        assert!(!row.contains("**"));
        assert!(!row.contains('`'));

        assert!(buf[(16, 0)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(21, 0)].modifier.contains(Modifier::BOLD));
        assert_eq!(buf[(25, 0)].fg, Theme::COMMAND);
        assert_eq!(buf[(15, 0)].bg, Theme::USER_BUBBLE);
        assert_eq!(buf[(29, 0)].bg, Theme::USER_BUBBLE);
        assert_ne!(buf[(14, 0)].bg, Theme::USER_BUBBLE);
    }

    #[test]
    fn test_model_bubble_is_left_aligned() {
        let turns = vec![Turn::model("Hello!")];
        let (buf, _) = render(&turns, false, 20, 5);

        assert!(row_text(&buf, 0).starts_with(" Hello! "));
        assert_eq!(buf[(0, 0)].bg, Theme::MODEL_BUBBLE);
        assert_eq!(buf[(7, 0)].bg, Theme::MODEL_BUBBLE);
    }

    #[test]
    fn test_spacer_between_turns_and_waiting_row() {
        let turns = vec![Turn::user("Hi"), Turn::model("Hello!")];
        let (buf, state) = render(&turns, true, 20, 10);

        // user, spacer, model, spacer, waiting
        assert_eq!(state.content_height, 5);
        assert_eq!(row_text(&buf, 1).trim(), "");
        assert!(row_text(&buf, 4).starts_with(WAITING_TEXT));
    }

    #[test]
    fn test_waiting_row_alone() {
        let (buf, state) = render(&[], true, 30, 3);
        assert_eq!(state.content_height, 1);
        assert!(row_text(&buf, 0).starts_with(WAITING_TEXT));
    }

    #[test]
    fn test_long_text_wraps_within_bubble_width() {
        let turns = vec![Turn::model("word ".repeat(20))];
        let list = MessageList::new(&turns);
        let rows = list.layout(20);

        assert!(rows.len() > 1);
        for row in &rows {
            assert!(row.width <= 16);
            assert!(row.line.width() <= 14, "{:?}", line_text(&row.line));
        }
    }

    #[test]
    fn test_sticks_to_bottom_when_overflowing() {
        let turns: Vec<Turn> = (0..10).map(|i| Turn::user(format!("m{}", i))).collect();
        let (buf, state) = render(&turns, false, 20, 3);

        assert_eq!(state.content_height, 19);
        assert_eq!(state.offset, 16);
        assert!(row_text(&buf, 2).contains("m9"));
    }

    #[test]
    fn test_scroll_up_releases_bottom() {
        let mut state = MessageListState {
            offset: 10,
            content_height: 20,
            viewport_height: 10,
            stick_to_bottom: true,
        };
        state.scroll_up(3);
        assert_eq!(state.offset, 7);
        assert!(!state.stick_to_bottom);

        state.scroll_down(100);
        assert_eq!(state.offset, 10);
        assert!(state.stick_to_bottom);

        state.scroll_up(5);
        state.scroll_to_bottom();
        assert_eq!(state.offset, 10);
        assert!(state.stick_to_bottom);
    }
}
