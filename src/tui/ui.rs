//! Main UI rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::ChatView;
use super::hit_test::ClickTarget;
use super::theme::Theme;
use super::widgets::{MessageList, StatusBar};

pub const TITLE: &str = "AI Chat";
pub const WELCOME_TITLE: &str = "Welcome!";
pub const WELCOME_HINT: &str = "Start a conversation by typing a message below.";
pub const SEND_BUTTON: &str = "[ ➤ ]";

/// Input grows with its content up to this many rows
const MAX_INPUT_ROWS: u16 = 5;

/// Render the entire UI
pub fn render(frame: &mut Frame, view: &mut ChatView) {
    view.hit_registry.clear();

    let input_rows = (view.input.line_count() as u16).clamp(1, MAX_INPUT_ROWS);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),              // Header
            Constraint::Min(0),                 // Messages
            Constraint::Length(1),              // Status
            Constraint::Length(input_rows + 1), // Input
        ])
        .split(frame.area());

    render_header(frame, chunks[0]);
    render_messages(frame, view, chunks[1]);
    render_status(frame, view, chunks[2]);
    render_input(frame, view, chunks[3]);

    if view.show_help {
        render_help(frame, frame.area());
    }
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Theme::TEXT)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Theme::BORDER)),
    );
    frame.render_widget(header, area);
}

fn render_messages(frame: &mut Frame, view: &mut ChatView, area: Rect) {
    // Leave a column of margin on each side
    let area = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };

    if view.state.is_empty() && !view.state.is_awaiting() {
        let welcome = Paragraph::new(vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default()
                    .fg(Theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(WELCOME_HINT, Style::default().fg(Theme::MUTED))),
            Line::from(Span::styled(
                "Press F1 for keyboard shortcuts",
                Style::default()
                    .fg(Theme::MUTED)
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center);

        frame.render_widget(welcome, area);
        return;
    }

    let list = MessageList::new(view.state.turns()).awaiting(view.state.is_awaiting());
    frame.render_stateful_widget(list, area, &mut view.list_state);
}

fn render_status(frame: &mut Frame, view: &ChatView, area: Rect) {
    let bar = StatusBar::new(view.state.is_awaiting(), view.state.len())
        .feedback(view.feedback.as_ref().map(|(_, f)| f));
    frame.render_widget(bar, area);
}

fn render_input(frame: &mut Frame, view: &mut ChatView, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Theme::BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(SEND_BUTTON.chars().count() as u16 + 1),
        ])
        .split(inner);

    let prompt_color = if view.input.is_disabled() {
        Theme::MUTED
    } else {
        Theme::ACCENT
    };
    frame.render_widget(
        Paragraph::new(Span::styled("› ", Style::default().fg(prompt_color))),
        columns[0],
    );

    frame.render_widget(view.input.widget(), columns[1]);
    view.hit_registry.register(columns[1], ClickTarget::Input);

    let enabled = !view.input.is_disabled() && !view.input.is_blank();
    let button_style = if enabled {
        Style::default()
            .fg(Theme::USER_TEXT)
            .bg(Theme::USER_BUBBLE)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::MUTED)
    };
    let button_area = Rect {
        x: columns[2].x + 1,
        width: columns[2].width.saturating_sub(1),
        height: 1,
        ..columns[2]
    };
    frame.render_widget(
        Paragraph::new(Span::styled(SEND_BUTTON, button_style)),
        button_area,
    );
    view.hit_registry.register(button_area, ClickTarget::SendButton);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Theme::ACCENT);
    let shortcuts = [
        (" Enter       ", "Send message"),
        (" Shift+Enter ", "New line (Alt+Enter also works)"),
        (" Ctrl+V      ", "Paste"),
        (" Ctrl+Y      ", "Copy last reply"),
        (" PgUp/PgDn   ", "Scroll messages"),
        (" Ctrl+↑/↓    ", "Scroll one line"),
        (" F1 / Esc    ", "Toggle / close help"),
        (" Ctrl+Q      ", "Quit"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    help_lines.extend(
        shortcuts
            .iter()
            .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)])),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::YELLOW))
        .title(" Help ");

    let area = centered_rect(60, 50, area);
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(help_lines).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
