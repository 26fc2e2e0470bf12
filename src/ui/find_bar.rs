use crate::app::{App, Mode};
use crate::editor::find::FindPhase;
use ratatui::{prelude::*, text::Span, widgets::Paragraph};
use unicode_width::UnicodeWidthStr;

/// Short match summary shown at the right of the find field.
fn match_summary(app: &App) -> String {
    let find = app.session.find();
    match find.phase() {
        FindPhase::Closed | FindPhase::Idle => String::new(),
        FindPhase::Searching => String::from("…"),
        FindPhase::NoMatches => String::from("no results"),
        FindPhase::Matches => format!("{}/{}", find.current + 1, find.matches.len()),
    }
}

/// Find field, plus the replace field in replace mode. Two rows at most.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme();
    let label_style = Style::default()
        .fg(theme.ui.line_numbers.to_color())
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(theme.ui.foreground.to_color());
    let bar_style = Style::default().bg(theme.ui.status_bar_bg.to_color());

    let summary = match_summary(app);
    let find_line = Line::from(vec![
        Span::styled(" Find:    ", label_style),
        Span::styled(app.find_input.clone(), text_style),
        Span::styled(
            format!("  {summary}"),
            Style::default().fg(theme.ui.popup_detail.to_color()),
        ),
    ]);
    let mut lines = vec![find_line];

    let show_replace = app.mode == Mode::Replace && area.height > 1;
    if show_replace {
        lines.push(Line::from(vec![
            Span::styled(" Replace: ", label_style),
            Span::styled(app.replace_input.clone(), text_style),
            Span::styled(
                "  Enter one  Ctrl+Enter all  Alt+U undo",
                Style::default().fg(theme.ui.popup_detail.to_color()),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).style(bar_style), area);

    let (input, row) = match app.mode {
        Mode::Replace if show_replace => (&app.replace_input, 1),
        Mode::Find | Mode::Replace => (&app.find_input, 0),
        Mode::Edit => return,
    };
    let x = area.x + 10 + input.width() as u16;
    frame.set_cursor_position(Position::new(
        x.min(area.x + area.width.saturating_sub(1)),
        area.y + row,
    ));
}
