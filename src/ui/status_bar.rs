use crate::app::{App, Mode};
use crate::editor::buffer::TextBuffer;
use ratatui::{prelude::*, text::Span, widgets::Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();

    let mode_str = match app.mode {
        Mode::Edit => " EDIT ",
        Mode::Find => " FIND ",
        Mode::Replace => " REPLACE ",
    };
    let mode_bg = match app.mode {
        Mode::Edit => theme.ui.mode_edit_bg.to_color(),
        Mode::Find | Mode::Replace => theme.ui.mode_find_bg.to_color(),
    };
    let mode_style = Style::default()
        .bg(mode_bg)
        .fg(theme.ui.mode_fg.to_color())
        .add_modifier(Modifier::BOLD);

    let file_name = app
        .project
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| app.project.name.clone());
    let file_info = format!(" {file_name} ");
    let modified = if app.is_modified() { "● " } else { "" };

    let cursor = app.session.buffer.cursor();
    let cursor_pos = format!(" Ln {}, Col {} ", cursor.line + 1, cursor.col + 1);
    let status_msg = format!(" {} ", app.status_message);

    let left_width = mode_str.width() + file_info.width() + modified.width() + status_msg.width();
    let right_width = cursor_pos.width();
    let padding = (area.width as usize)
        .checked_sub(left_width + right_width)
        .unwrap_or(1)
        .max(1);

    let line = Line::from(vec![
        Span::styled(mode_str, mode_style),
        Span::styled(
            file_info,
            Style::default()
                .fg(theme.ui.status_bar_fg.to_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(modified, Style::default().fg(theme.ui.modified.to_color())),
        Span::styled(status_msg, Style::default().fg(theme.ui.status_bar_fg.to_color())),
        Span::raw(" ".repeat(padding)),
        Span::styled(cursor_pos, Style::default().fg(theme.ui.status_bar_fg.to_color())),
    ]);

    let paragraph =
        Paragraph::new(line).style(Style::default().bg(theme.ui.status_bar_bg.to_color()));
    frame.render_widget(paragraph, area);
}
