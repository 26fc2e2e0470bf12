use ratatui::{
    prelude::*,
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::UnicodeWidthChar;

use crate::editor::buffer::TextBuffer;
use crate::editor::position::Position as TextPosition;
use crate::editor::EditorSession;
use crate::syntax::{Highlighter, LexState, TokenType};
use crate::theme::Theme;

pub struct EditorView<'a> {
    pub session: &'a EditorSession,
    pub title: &'a str,
    pub modified: bool,
    pub focused: bool,
    pub show_line_numbers: bool,
}

/// Gutter width, including the separating space.
pub fn gutter_width(line_count: usize, show_line_numbers: bool) -> usize {
    if show_line_numbers {
        line_count.to_string().len().max(3) + 1
    } else {
        0
    }
}

/// Display width of the first `col` chars of `line`.
pub fn display_col(line: &str, col: usize) -> usize {
    line.chars()
        .take(col)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Draws the buffer and returns the cursor's screen position.
pub fn render(frame: &mut Frame, area: Rect, view: &EditorView, theme: &Theme) -> Option<(u16, u16)> {
    let buf = &view.session.buffer;
    let line_count = buf.line_count();
    let gutter = gutter_width(line_count, view.show_line_numbers);

    let title = if view.modified {
        format!(" {} ● ", view.title)
    } else {
        format!(" {} ", view.title)
    };
    let border_style = if view.focused {
        Style::default().fg(theme.ui.border_focused.to_color())
    } else {
        Style::default().fg(theme.ui.border.to_color())
    };
    let block = Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.ui.foreground.to_color())
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_height = inner.height as usize;
    let first = buf.scroll_offset.min(line_count.saturating_sub(1));
    let last = (first + visible_height).min(line_count);

    let highlights = view.session.highlights();
    let selection = buf.selection();
    let cursor = buf.cursor();

    // Lexer state has to be carried from the top of the document.
    let mut state = LexState::default();
    for line in 0..first {
        state = Highlighter::tokenize_line(&buf.line_text(line), state).1;
    }

    let mut lines = Vec::with_capacity(last - first);
    for idx in first..last {
        let text = buf.line_text(idx);
        let (classes, next) = Highlighter::classify_chars(&text, state);
        state = next;

        let mut spans = Vec::new();
        if view.show_line_numbers {
            spans.push(Span::styled(
                format!("{:>width$} ", idx + 1, width = gutter - 1),
                Style::default().fg(theme.ui.line_numbers.to_color()),
            ));
        }

        let line_start = buf.offset_of(TextPosition::new(idx, 0));
        let base = if idx == cursor.line && view.focused {
            Style::default().bg(theme.ui.cursor_line.to_color())
        } else {
            Style::default()
        };
        let styles: Vec<Style> = text
            .chars()
            .enumerate()
            .map(|(col, _)| {
                let class = classes.get(col).copied().unwrap_or(TokenType::Plain);
                let mut style = base;
                if let Some(markup) = class.style(&theme.markup) {
                    style = style.patch(markup);
                }
                let offset = line_start + col;
                if let Some((_, current)) = highlights
                    .iter()
                    .find(|(m, _)| m.offset <= offset && offset < m.end())
                {
                    let bg = if *current {
                        &theme.ui.search_match_current
                    } else {
                        &theme.ui.search_match
                    };
                    style = style
                        .bg(bg.to_color())
                        .fg(theme.ui.search_match_fg.to_color());
                }
                let here = TextPosition::new(idx, col);
                if selection.is_some_and(|(from, to)| from <= here && here < to) {
                    style = style.bg(theme.ui.selection.to_color());
                }
                style
            })
            .collect();

        spans.extend(group_spans(&text, &styles));
        lines.push(Line::from(spans).style(base));
    }

    let paragraph =
        Paragraph::new(lines).style(Style::default().bg(theme.ui.background.to_color()));
    frame.render_widget(paragraph, inner);

    if cursor.line < first || cursor.line >= first + visible_height.max(1) {
        return None;
    }
    let x = inner.x as usize + gutter + display_col(&buf.line_text(cursor.line), cursor.col);
    let y = inner.y as usize + (cursor.line - first);
    let pos = (
        x.min((inner.x + inner.width.saturating_sub(1)) as usize) as u16,
        y as u16,
    );
    if view.focused {
        frame.set_cursor_position(Position::new(pos.0, pos.1));
    }
    Some(pos)
}

/// Merge runs of chars that share a style into spans.
fn group_spans(text: &str, styles: &[Style]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style: Option<Style> = None;
    for (ch, style) in text.chars().zip(styles.iter().copied()) {
        if run_style != Some(style) {
            if let Some(prev) = run_style {
                spans.push(Span::styled(std::mem::take(&mut run), prev));
            }
            run_style = Some(style);
        }
        run.push(ch);
    }
    if let Some(prev) = run_style {
        spans.push(Span::styled(run, prev));
    }
    spans
}
