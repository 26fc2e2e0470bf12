use crate::app::{App, Mode};
use crate::ui::editor::EditorView;
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = app.config.theme.clone();

    // Editor + (optional) find bar + status bar
    let find_bar_height = match app.mode {
        Mode::Replace => 2,
        _ if app.find_open() => 1,
        _ => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(find_bar_height),
            Constraint::Length(1),
        ])
        .split(size);

    let editor_area = chunks[0];
    // Two border rows.
    app.update_editor_visible_height(editor_area.height.saturating_sub(2) as usize);

    let title = app.project.name.clone();
    let view = EditorView {
        session: &app.session,
        title: &title,
        modified: app.is_modified(),
        focused: app.mode == Mode::Edit,
        show_line_numbers: app.config.editor.show_line_numbers,
    };
    let cursor = super::editor::render(frame, editor_area, &view, &theme);

    if app.find_open() {
        super::find_bar::render(frame, chunks[1], app);
    }
    super::status_bar::render(frame, chunks[2], app);

    if app.mode == Mode::Edit {
        if let Some(pos) = cursor {
            super::autocomplete::render(frame, app.session.completion(), pos, &theme);
        }
    }
}
