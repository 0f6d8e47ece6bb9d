//! Markdown rendering for chat bubbles
//!
//! Converts markdown text into styled ratatui lines, then wraps them to a
//! bubble width. Handles headings, emphasis, strong, strikethrough, inline
//! code, fenced code blocks, lists, block quotes, links and rules.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::Theme;

/// Render markdown into unwrapped lines using `base` as the text style.
///
/// Always returns at least one line so empty text still takes up a row.
pub fn render_markdown(text: &str, base: Style) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(base);
    for event in Parser::new_ext(text, options) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct Renderer {
    base: Style,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list; `Some(n)` is the next ordered number
    lists: Vec<Option<u64>>,
    pending_marker: Option<String>,
    quote_depth: usize,
    in_code_block: bool,
    in_html_block: bool,
    link_urls: Vec<String>,
    needs_gap: bool,
}

impl Renderer {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            pending_marker: None,
            quote_depth: 0,
            in_code_block: false,
            in_html_block: false,
            link_urls: Vec::new(),
            needs_gap: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let style = f(self.style());
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_text(&text);
                } else {
                    self.push_text(&text, self.style());
                }
            }
            Event::Code(code) => {
                let style = self.style().fg(Theme::COMMAND);
                self.push_text(&code, style);
            }
            Event::Html(html) if self.in_html_block => {
                self.literal_lines(&html, self.style(), "");
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_text(&html, self.style());
            }
            Event::SoftBreak => self.push_text(" ", self.style()),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.block_start();
                let style = self.base.fg(Theme::MUTED);
                self.push_text(&"─".repeat(20), style);
                self.flush_line();
                self.needs_gap = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_text(marker, self.style());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.block_start(),
            Tag::Heading { level, .. } => {
                self.block_start();
                let modifier = if level == HeadingLevel::H1 {
                    Modifier::BOLD | Modifier::UNDERLINED
                } else {
                    Modifier::BOLD
                };
                self.push_style(|s| s.fg(Theme::HEADER).add_modifier(modifier));
            }
            Tag::BlockQuote => {
                self.block_start();
                self.quote_depth += 1;
                self.push_style(|s| s.add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.block_start();
                self.in_code_block = true;
            }
            Tag::HtmlBlock => {
                self.block_start();
                self.in_html_block = true;
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_start();
                } else {
                    self.flush_line();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.pending_marker = Some(marker);
            }
            Tag::Emphasis => self.push_style(|s| s.add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(|s| s.add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self.push_style(|s| s.add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                self.link_urls.push(dest_url.to_string());
                self.push_style(|s| s.fg(Theme::ACCENT).add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line();
                self.needs_gap = true;
            }
            TagEnd::Heading(_) => {
                self.pop_style();
                self.flush_line();
                self.needs_gap = true;
            }
            TagEnd::BlockQuote => {
                self.flush_line();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.needs_gap = true;
            }
            TagEnd::CodeBlock => {
                self.flush_line();
                self.in_code_block = false;
                self.needs_gap = true;
            }
            TagEnd::HtmlBlock => {
                self.flush_line();
                self.in_html_block = false;
                self.needs_gap = true;
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.needs_gap = true;
                }
            }
            TagEnd::Item => {
                self.flush_line();
                // Loose list paragraphs should not space out the items
                self.needs_gap = false;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link | TagEnd::Image => {
                self.pop_style();
                if let Some(url) = self.link_urls.pop() {
                    if !url.is_empty() {
                        let style = self.base.fg(Theme::MUTED);
                        self.push_text(&format!(" ({})", url), style);
                    }
                }
            }
            _ => {}
        }
    }

    /// Separate a new block from the previous one with a blank line.
    fn block_start(&mut self) {
        self.flush_line();
        if self.needs_gap && !self.lines.is_empty() {
            let prefix = self.prefix_spans(false);
            self.lines.push(Line::from(prefix));
        }
        self.needs_gap = false;
    }

    /// Quote bars and list indentation for the start of a line.
    fn prefix_spans(&mut self, with_marker: bool) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for _ in 0..self.quote_depth {
            spans.push(Span::styled("│ ", self.base.fg(Theme::ACCENT)));
        }
        if !self.lists.is_empty() {
            let indent = "  ".repeat(self.lists.len() - 1);
            if !indent.is_empty() {
                spans.push(Span::styled(indent, self.base));
            }
            let marker = if with_marker {
                self.pending_marker.take()
            } else {
                None
            };
            match marker {
                Some(marker) => spans.push(Span::styled(marker, self.base.fg(Theme::YELLOW))),
                None => spans.push(Span::styled("  ", self.base)),
            }
        }
        spans
    }

    fn push_text(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if self.current.is_empty() {
            self.current = self.prefix_spans(true);
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn code_text(&mut self, text: &str) {
        self.literal_lines(text, self.base.fg(Theme::COMMAND), "  ");
    }

    /// Text whose newlines are line breaks, as in code and raw HTML blocks.
    fn literal_lines(&mut self, text: &str, style: Style, indent: &'static str) {
        for line in text.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            if self.current.is_empty() {
                self.current = self.prefix_spans(true);
                if !indent.is_empty() {
                    self.current.push(Span::styled(indent, style));
                }
            }
            if !content.is_empty() {
                self.current.push(Span::styled(content.to_string(), style));
            }
            if line.ends_with('\n') {
                self.lines.push(Line::from(std::mem::take(&mut self.current)));
            }
        }
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

/// Wrap lines to `width` columns, breaking at whitespace where possible.
///
/// Words longer than the width are split across lines. Styles are kept
/// per span.
pub fn wrap_lines(lines: &[Line<'static>], width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return lines.to_vec();
    }

    let mut out = Vec::new();
    for line in lines {
        if line.width() <= width {
            out.push(line.clone());
            continue;
        }

        let mut current: Vec<Span<'static>> = Vec::new();
        let mut current_width = 0;

        for span in &line.spans {
            for run in split_runs(&span.content) {
                let run_width = run.width();
                if current_width + run_width <= width {
                    current.push(Span::styled(run.to_string(), span.style));
                    current_width += run_width;
                    continue;
                }

                // A space that does not fit becomes the line break
                if run.chars().all(char::is_whitespace) {
                    out.push(finish_wrapped(std::mem::take(&mut current)));
                    current_width = 0;
                    continue;
                }

                if current_width > 0 {
                    out.push(finish_wrapped(std::mem::take(&mut current)));
                    current_width = 0;
                }

                let mut piece = String::new();
                for ch in run.chars() {
                    let ch_width = ch.width().unwrap_or(0);
                    if current_width + ch_width > width && !piece.is_empty() {
                        out.push(Line::from(vec![Span::styled(
                            std::mem::take(&mut piece),
                            span.style,
                        )]));
                        current_width = 0;
                    }
                    piece.push(ch);
                    current_width += ch_width;
                }
                current.push(Span::styled(piece, span.style));
            }
        }
        out.push(Line::from(current));
    }
    out
}

/// Close a wrapped line, dropping the whitespace it broke at.
fn finish_wrapped(mut spans: Vec<Span<'static>>) -> Line<'static> {
    while spans
        .last()
        .is_some_and(|s| s.content.chars().all(char::is_whitespace))
    {
        spans.pop();
    }
    Line::from(spans)
}

/// Split text into alternating runs of whitespace and non-whitespace.
fn split_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut prev_ws: Option<bool> = None;

    for (i, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        if let Some(prev) = prev_ws {
            if prev != ws {
                runs.push(&text[start..i]);
                start = i;
            }
        }
        prev_ws = Some(ws);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

/// Plain text of a line, without styling.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    fn find_span<'a>(lines: &'a [Line<'static>], text: &str) -> &'a Span<'static> {
        lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content == text)
            .unwrap_or_else(|| panic!("no span {:?} in {:?}", text, texts(lines)))
    }

    #[test]
    fn test_plain_text() {
        let lines = render_markdown("Hello world", Style::default());
        assert_eq!(texts(&lines), vec!["Hello world"]);
    }

    #[test]
    fn test_empty_text_still_has_a_line() {
        let lines = render_markdown("", Style::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "");
    }

    #[test]
    fn test_bold_and_italic_are_interpreted() {
        let lines = render_markdown("Normal **bold** and *italic*", Style::default());
        assert_eq!(texts(&lines), vec!["Normal bold and italic"]);
        assert!(find_span(&lines, "bold")
            .style
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(find_span(&lines, "italic")
            .style
            .add_modifier
            .contains(Modifier::ITALIC));
    }

    #[test]
    fn test_nested_emphasis_keeps_base_color() {
        let base = Style::default().fg(Theme::USER_TEXT);
        let lines = render_markdown("***both***", base);
        let span = find_span(&lines, "both");
        assert_eq!(span.style.fg, Some(Theme::USER_TEXT));
        assert!(span.style.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
    }

    #[test]
    fn test_inline_code_and_strikethrough() {
        let lines = render_markdown("Use `cargo` not ~~make~~", Style::default());
        assert_eq!(find_span(&lines, "cargo").style.fg, Some(Theme::COMMAND));
        assert!(find_span(&lines, "make")
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_heading_drops_hashes() {
        let lines = render_markdown("# Title\n\nBody", Style::default());
        assert_eq!(texts(&lines), vec!["Title", "", "Body"]);
        assert_eq!(find_span(&lines, "Title").style.fg, Some(Theme::HEADER));
    }

    #[test]
    fn test_code_block_lines() {
        let lines = render_markdown("```rust\nfn main() {\n}\n```", Style::default());
        assert_eq!(texts(&lines), vec!["  fn main() {", "  }"]);
        assert_eq!(find_span(&lines, "fn main() {").style.fg, Some(Theme::COMMAND));
    }

    #[test]
    fn test_html_block_keeps_its_lines() {
        let lines = render_markdown("<div>\nhi\n</div>\n\nafter", Style::default());
        assert_eq!(texts(&lines), vec!["<div>", "hi", "</div>", "", "after"]);
    }

    #[test]
    fn test_inline_html_stays_inline() {
        let lines = render_markdown("a <b>b</b> c", Style::default());
        assert_eq!(texts(&lines), vec!["a <b>b</b> c"]);
    }

    #[test]
    fn test_lists() {
        let lines = render_markdown("- one\n- two\n\n1. first\n2. second", Style::default());
        assert_eq!(
            texts(&lines),
            vec!["• one", "• two", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn test_nested_list_is_indented() {
        let lines = render_markdown("- outer\n  - inner", Style::default());
        assert_eq!(texts(&lines), vec!["• outer", "  • inner"]);
    }

    #[test]
    fn test_blockquote_has_bar() {
        let lines = render_markdown("> quoted", Style::default());
        assert_eq!(texts(&lines), vec!["│ quoted"]);
        assert!(find_span(&lines, "quoted")
            .style
            .add_modifier
            .contains(Modifier::ITALIC));
    }

    #[test]
    fn test_link_shows_url() {
        let lines = render_markdown("[Rust](https://rust-lang.org)", Style::default());
        assert_eq!(texts(&lines), vec!["Rust (https://rust-lang.org)"]);
        assert!(find_span(&lines, "Rust")
            .style
            .add_modifier
            .contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_hard_break_splits_lines() {
        let lines = render_markdown("a  \nb", Style::default());
        assert_eq!(texts(&lines), vec!["a", "b"]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let lines = vec![Line::from("the quick brown fox")];
        let wrapped = wrap_lines(&lines, 10);
        assert_eq!(texts(&wrapped), vec!["the quick", "brown fox"]);
        assert!(wrapped.iter().all(|l| l.width() <= 10));
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = vec![Line::from("abcdefghij")];
        let wrapped = wrap_lines(&lines, 4);
        assert_eq!(texts(&wrapped), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_span_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![Line::from(vec![
            Span::raw("plain "),
            Span::styled("bold words here", bold),
        ])];
        let wrapped = wrap_lines(&lines, 11);
        assert_eq!(texts(&wrapped), vec!["plain bold", "words here"]);
        assert_eq!(find_span(&wrapped, "words").style, bold);
    }

    #[test]
    fn test_wrap_wide_chars() {
        let lines = vec![Line::from("中文中文")];
        let wrapped = wrap_lines(&lines, 4);
        assert_eq!(texts(&wrapped), vec!["中文", "中文"]);
    }

    #[test]
    fn test_split_runs() {
        assert_eq!(split_runs("a  bc d"), vec!["a", "  ", "bc", " ", "d"]);
        assert!(split_runs("").is_empty());
    }
}
