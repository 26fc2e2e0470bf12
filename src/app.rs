use crate::config::Config;
use crate::editor::EditorSession;
use crate::project::Project;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Longest the event loop blocks when no debounce is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Keys go to the buffer.
    Edit,
    /// Keys edit the find query.
    Find,
    /// Keys edit the replacement text.
    Replace,
}

pub struct App {
    pub mode: Mode,
    pub session: EditorSession,
    pub project: Project,
    pub config: Config,
    pub find_input: String,
    pub replace_input: String,
    pub status_message: String,
    quit_armed: bool,
}

impl App {
    pub fn new(path: &Path, config: Config) -> Result<Self> {
        let project = Project::open(path)?;
        let session = EditorSession::new(&project.code, &config.editor);

        let status_message = if project.saved {
            format!("Opened: {}", project.path.display())
        } else {
            format!("New file: {} (Ctrl+S to create)", project.path.display())
        };
        info!(target: "app", project = %project.name, "started");

        Ok(Self {
            mode: Mode::Edit,
            session,
            project,
            config,
            find_input: String::new(),
            replace_input: String::new(),
            status_message,
            quit_armed: false,
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    pub fn is_modified(&self) -> bool {
        self.session.is_modified() || !self.project.saved
    }

    pub fn save(&mut self) -> Result<()> {
        let code = self.session.text();
        self.project.save(&code)?;
        self.session.mark_saved();
        self.quit_armed = false;
        self.status_message = format!("Saved: {}", self.project.path.display());
        Ok(())
    }

    /// Returns true when the app may exit. With unsaved changes the first
    /// request only arms the quit.
    pub fn request_quit(&mut self) -> bool {
        if self.is_modified() && !self.quit_armed {
            self.quit_armed = true;
            self.status_message =
                String::from("Unsaved changes. Press Ctrl+Q again to quit, Ctrl+S to save");
            return false;
        }
        true
    }

    pub fn disarm_quit(&mut self) {
        self.quit_armed = false;
    }

    // ========== Find / replace ==========

    pub fn open_find(&mut self) {
        self.session.dismiss_completion();
        self.session.open_find_panel();
        self.mode = Mode::Find;
    }

    pub fn open_replace(&mut self) {
        if !self.session.find().is_open() {
            self.open_find();
        }
        self.mode = Mode::Replace;
    }

    pub fn close_find(&mut self) {
        self.session.close_find_panel();
        self.find_input.clear();
        self.replace_input.clear();
        self.mode = Mode::Edit;
    }

    pub fn find_open(&self) -> bool {
        self.session.find().is_open()
    }

    pub fn update_query(&mut self, now: Instant) {
        self.session.set_query(&self.find_input, now);
    }

    pub fn replace_one(&mut self, now: Instant) {
        if !self.session.replace_one(&self.replace_input, now) {
            self.status_message = String::from("No active match");
        }
    }

    pub fn replace_all(&mut self, now: Instant) {
        self.session.replace_all(&self.replace_input, now);
    }

    pub fn undo_last_replace(&mut self, now: Instant) {
        if !self.session.undo_last_replace(now) {
            self.status_message = String::from("Nothing to undo");
        }
    }

    pub fn undo_all_replacements(&mut self, now: Instant) {
        if !self.session.undo_all_replacements(now) {
            self.status_message = String::from("Nothing to undo");
        }
    }

    // ========== Event loop support ==========

    /// Fire due debounce timers and pick up status text.
    pub fn tick(&mut self, now: Instant) {
        self.session.poll(now);
        self.sync_status();
    }

    pub fn sync_status(&mut self) {
        if let Some(status) = self.session.take_status() {
            self.status_message = status;
        }
    }

    /// How long the event loop may wait for input before the next debounce
    /// deadline.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.session.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(IDLE_POLL),
            None => IDLE_POLL,
        }
    }

    pub fn update_editor_visible_height(&mut self, height: usize) {
        self.session.buffer.visible_height = height.max(1);
    }

    pub fn report_error(&mut self, context: &str, err: &anyhow::Error) {
        warn!(target: "app", error = %err, "{context}");
        self.status_message = format!("{context}: {err:#}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(&dir.path().join("icon.svg"), Config::default()).unwrap()
    }

    #[test]
    fn new_file_must_be_saved_before_quit() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        assert!(app.is_modified());
        assert!(!app.request_quit());
        assert!(app.request_quit());
    }

    #[test]
    fn save_writes_buffer_and_clears_modified() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.session.edit(Instant::now(), |buf| buf.insert_text("<!-- x -->"));
        app.save().unwrap();
        assert!(!app.is_modified());
        assert!(app.request_quit());
        let written = std::fs::read_to_string(dir.path().join("icon.svg")).unwrap();
        assert!(written.starts_with("<!-- x --><svg"));
    }

    #[test]
    fn poll_timeout_tracks_debounce() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), IDLE_POLL);
        app.open_find();
        app.find_input = String::from("svg");
        app.update_query(now);
        assert_eq!(app.poll_timeout(now), IDLE_POLL);
        assert_eq!(
            app.poll_timeout(now + Duration::from_millis(200)),
            Duration::from_millis(100)
        );
        app.tick(now + Duration::from_millis(300));
        assert_eq!(app.status_message, "3 matches");
    }

    #[test]
    fn close_find_returns_to_edit_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.open_replace();
        assert_eq!(app.mode, Mode::Replace);
        assert!(app.find_open());
        app.close_find();
        assert_eq!(app.mode, Mode::Edit);
        assert!(!app.find_open());
    }
}
