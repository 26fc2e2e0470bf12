//! Completion popup rendering

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::completion::{CandidateKind, CompletionEngine};
use crate::theme::Theme;

const MAX_LABEL_WIDTH: usize = 20;
const MAX_POPUP_WIDTH: u16 = 60;

/// Render the completion popup next to the cursor.
pub fn render(
    frame: &mut Frame,
    completion: &CompletionEngine,
    cursor_screen_pos: (u16, u16),
    theme: &Theme,
) {
    if !completion.is_visible() {
        return;
    }

    let visible = completion.visible_candidates();
    let selected_idx = completion.visible_selected();

    let label_width = visible
        .iter()
        .map(|c| c.label.width())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let detail_width = visible
        .iter()
        .map(|c| c.description.width())
        .max()
        .unwrap_or(0);

    // icon + space + label + gap + description + borders
    let content_width = 2 + label_width + 2 + detail_width;
    let popup_width = (content_width as u16 + 2).clamp(20, MAX_POPUP_WIDTH);
    let popup_height = visible.len() as u16 + 2;

    let (cursor_x, cursor_y) = cursor_screen_pos;
    let area = frame.area();

    let popup_x = cursor_x.min(area.width.saturating_sub(popup_width));
    let popup_y = if cursor_y + popup_height + 1 < area.height {
        cursor_y + 1
    } else {
        cursor_y.saturating_sub(popup_height)
    };

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height).intersection(area);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .map(|(i, candidate)| {
            let is_selected = selected_idx == Some(i);
            let base_style = if is_selected {
                Style::default()
                    .bg(theme.ui.popup_selected.to_color())
                    .fg(theme.ui.foreground.to_color())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.ui.foreground.to_color())
            };
            let kind_color = match candidate.kind {
                CandidateKind::Element => &theme.markup.element_kind,
                CandidateKind::Attribute => &theme.markup.attribute_kind,
                CandidateKind::Color => &theme.markup.color_kind,
            };

            let label: String = candidate.label.chars().take(MAX_LABEL_WIDTH).collect();
            let pad = label_width.saturating_sub(label.width()) + 2;
            Line::from(vec![
                Span::styled(
                    format!("{} ", candidate.kind.icon()),
                    base_style.fg(kind_color.to_color()),
                ),
                Span::styled(label, base_style),
                Span::styled(" ".repeat(pad), base_style),
                Span::styled(
                    candidate.description.clone(),
                    base_style.fg(theme.ui.popup_detail.to_color()),
                ),
            ])
        })
        .collect();

    let total = completion.candidates.len();
    let title = match completion.selected_index {
        Some(idx) if total > visible.len() => format!(" {}/{} ", idx + 1, total),
        _ => String::new(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.ui.border.to_color()))
        .title(title)
        .style(Style::default().bg(theme.ui.popup_bg.to_color()));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}
