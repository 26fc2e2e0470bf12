use crate::app::{App, Mode};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Save,
}

/// Wait for input until the next debounce deadline, then handle one event.
pub fn handle_event(app: &mut App) -> Result<Action> {
    if !event::poll(app.poll_timeout(Instant::now()))? {
        return Ok(Action::None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            Ok(handle_key(app, key, Instant::now()))
        }
        Event::Paste(text) if app.mode == Mode::Edit => {
            app.session
                .edit(Instant::now(), |buf| buf.insert_text(&text.replace("\r\n", "\n")));
            Ok(Action::None)
        }
        _ => Ok(Action::None),
    }
}

pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keybindings
    match key.code {
        KeyCode::Char('s') if ctrl => return Action::Save,
        KeyCode::Char('q') if ctrl => {
            return if app.request_quit() {
                Action::Quit
            } else {
                Action::None
            };
        }
        _ => app.disarm_quit(),
    }

    if ctrl {
        match key.code {
            KeyCode::Char('z') => {
                app.session.undo(now);
                return Action::None;
            }
            KeyCode::Char('y') => {
                app.session.redo(now);
                return Action::None;
            }
            KeyCode::Char('f') => {
                app.open_find();
                return Action::None;
            }
            KeyCode::Char('r') => {
                app.open_replace();
                return Action::None;
            }
            _ => {}
        }
    }

    // Match navigation works wherever the find panel is open.
    if app.find_open() && key.code == KeyCode::F(3) {
        if key.modifiers.contains(KeyModifiers::SHIFT) {
            app.session.prev(now);
        } else {
            app.session.next(now);
        }
        return Action::None;
    }

    match app.mode {
        Mode::Edit => handle_edit_mode(app, key, now),
        Mode::Find => handle_find_mode(app, key, now),
        Mode::Replace => handle_replace_mode(app, key, now),
    }
    Action::None
}

fn handle_edit_mode(app: &mut App, key: KeyEvent, now: Instant) {
    // Completion popup keys; everything else reaches the buffer.
    if app.session.completion_visible() {
        match key.code {
            KeyCode::Esc => {
                app.session.dismiss_completion();
                return;
            }
            KeyCode::Tab | KeyCode::Enter => {
                app.session.accept_selected_completion(now);
                return;
            }
            KeyCode::Up => {
                app.session.move_completion_selection(-1);
                return;
            }
            KeyCode::Down => {
                app.session.move_completion_selection(1);
                return;
            }
            _ => {}
        }
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc if app.find_open() => app.close_find(),
        KeyCode::Char(' ') if ctrl => app.session.force_completion(),
        KeyCode::Char('t') if ctrl => {
            let indent = " ".repeat(app.config.editor.tab_size);
            app.session.edit(now, |buf| buf.insert_text(&indent));
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            let text = c.to_string();
            app.session.edit(now, |buf| buf.insert_text(&text));
        }
        KeyCode::Enter => app.session.edit(now, |buf| buf.insert_text("\n")),
        KeyCode::Tab => {
            let indent = " ".repeat(app.config.editor.tab_size);
            app.session.edit(now, |buf| buf.insert_text(&indent));
        }
        KeyCode::Backspace => app.session.edit(now, |buf| buf.backspace()),
        KeyCode::Delete => app.session.edit(now, |buf| buf.delete_forward()),
        KeyCode::Left => app.session.move_cursor(now, |buf| buf.move_left()),
        KeyCode::Right => app.session.move_cursor(now, |buf| buf.move_right()),
        KeyCode::Up => app.session.move_cursor(now, |buf| buf.move_up()),
        KeyCode::Down => app.session.move_cursor(now, |buf| buf.move_down()),
        KeyCode::Home => app.session.move_cursor(now, |buf| buf.move_to_line_start()),
        KeyCode::End => app.session.move_cursor(now, |buf| buf.move_to_line_end()),
        _ => {}
    }
}

fn handle_find_mode(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.close_find(),
        // Back to the buffer with the panel still open.
        KeyCode::Tab => app.mode = Mode::Edit,
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => app.session.prev(now),
        KeyCode::Enter => app.session.next(now),
        KeyCode::Down => app.mode = Mode::Replace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.find_input.push(c);
            app.update_query(now);
        }
        KeyCode::Backspace => {
            app.find_input.pop();
            app.update_query(now);
        }
        _ => {}
    }
}

fn handle_replace_mode(app: &mut App, key: KeyEvent, now: Instant) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => app.close_find(),
        KeyCode::Tab => app.mode = Mode::Edit,
        KeyCode::Up => app.mode = Mode::Find,
        KeyCode::Enter if ctrl || alt => app.replace_all(now),
        KeyCode::Enter => app.replace_one(now),
        KeyCode::Char('U') if alt => app.undo_all_replacements(now),
        KeyCode::Char('u') if alt => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.undo_all_replacements(now);
            } else {
                app.undo_last_replace(now);
            }
        }
        KeyCode::Char(c) if !ctrl && !alt => app.replace_input.push(c),
        KeyCode::Backspace => {
            app.replace_input.pop();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::editor::buffer::TextBuffer;
    use std::time::Duration;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(&dir.path().join("icon.svg"), Config::default()).unwrap()
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
        handle_key(app, KeyEvent::new(code, modifiers), Instant::now())
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    /// Let every pending debounce fire.
    fn settle(app: &mut App) {
        app.tick(Instant::now() + Duration::from_secs(1));
    }

    #[test]
    fn typing_opens_completion_and_enter_accepts() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Down, KeyModifiers::NONE);
        press(&mut app, KeyCode::End, KeyModifiers::NONE);
        type_str(&mut app, "<circ");
        assert!(!app.session.completion_visible());
        settle(&mut app);
        assert!(app.session.completion_visible());

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert!(!app.session.completion_visible());
        assert!(app.session.text().contains("  <circle cx=\"50\""));
    }

    #[test]
    fn escape_hides_popup_without_editing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "rec");
        settle(&mut app);
        assert!(app.session.completion_visible());
        let before = app.session.text();
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.session.completion_visible());
        assert_eq!(app.session.text(), before);
    }

    #[test]
    fn tab_accepts_completion_instead_of_indenting() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "rec");
        settle(&mut app);
        assert!(app.session.completion_visible());

        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(!app.session.completion_visible());
        let text = app.session.text();
        assert!(text.starts_with("<rect x=\""));
        assert!(!text.starts_with("rec "));
    }

    #[test]
    fn arrows_move_popup_selection_not_cursor() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "<c");
        settle(&mut app);
        assert!(app.session.completion_visible());
        assert_eq!(app.session.completion().visible_selected(), Some(0));
        let cursor = app.session.buffer.cursor();

        press(&mut app, KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.session.completion().visible_selected(), Some(1));
        assert_eq!(app.session.buffer.cursor(), cursor);

        press(&mut app, KeyCode::Up, KeyModifiers::NONE);
        assert_eq!(app.session.completion().visible_selected(), Some(0));
        assert_eq!(app.session.buffer.cursor(), cursor);
    }

    #[test]
    fn ctrl_z_and_ctrl_y() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        type_str(&mut app, "ab");
        press(&mut app, KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert!(app.session.text().starts_with("a<svg"));
        press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert!(app.session.text().starts_with("ab<svg"));
    }

    #[test]
    fn ctrl_t_inserts_tab_size_spaces() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert!(app.session.text().starts_with("  <svg"));
    }

    #[test]
    fn find_then_replace_all_and_undo() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let original = app.session.text();

        press(&mut app, KeyCode::Char('f'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, Mode::Find);
        type_str(&mut app, "svg");
        settle(&mut app);
        assert_eq!(app.session.find().matches.len(), 3);

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.session.find().current, 1);

        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, Mode::Replace);
        type_str(&mut app, "g");
        press(&mut app, KeyCode::Enter, KeyModifiers::CONTROL);
        assert!(!app.session.text().contains("svg"));

        press(&mut app, KeyCode::Char('u'), KeyModifiers::ALT | KeyModifiers::SHIFT);
        assert_eq!(app.session.text(), original);

        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.mode, Mode::Edit);
        assert!(!app.find_open());
    }

    #[test]
    fn quit_needs_second_press_when_modified() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        assert_eq!(press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL), Action::None);
        assert_eq!(press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL), Action::Quit);
    }

    #[test]
    fn other_key_disarms_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL), Action::None);
    }
}
