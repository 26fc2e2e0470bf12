//! Per-document editor session.
//!
//! `EditorSession` owns the buffer and the three engines layered on it
//! (history, completion, find/replace). Every content mutation goes through
//! the buffer's change journal; the session drains it synchronously and
//! dispatches each change to the engines according to where it came from.

pub mod buffer;
pub mod debounce;
pub mod find;
pub mod history;
pub mod position;

use std::time::Instant;
use tracing::{debug, info, trace};

use crate::completion::trigger::{extract_trigger, line_prefix};
use crate::completion::CompletionEngine;
use crate::config::EditorConfig;
use buffer::{Buffer, ChangeKind, TextBuffer};
use debounce::Debouncer;
use find::{FindPhase, FindSession, Match};
use history::History;
use position::Position;

/// Who caused a buffer mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typing, deleting, pasting.
    User,
    /// Undo/redo restoring a snapshot.
    Restore,
    /// An accepted completion.
    Completion,
    /// A find/replace operation.
    Replace,
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    pub buffer: Buffer,
    history: History,
    completion: CompletionEngine,
    find: FindSession,
    completion_timer: Debouncer,
    find_timer: Debouncer,
    modified: bool,
    revision: u64,
    status: Option<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new("", &EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(text: &str, config: &EditorConfig) -> Self {
        let mut history = History::new(config.history_limit);
        history.reset_session(text);
        Self {
            buffer: Buffer::with_text(text),
            history,
            completion: CompletionEngine::new(config.max_completions),
            find: FindSession::new(),
            completion_timer: Debouncer::from_millis(config.completion_debounce_ms),
            find_timer: Debouncer::from_millis(config.find_debounce_ms),
            modified: false,
            revision: 0,
            status: None,
        }
    }

    // ========== Lifecycle ==========

    /// Load a new document and start a fresh history from it.
    pub fn open_document(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.buffer.take_changes();
        self.buffer.set_cursor(Position::default());
        self.buffer.scroll_offset = 0;
        self.reset_history(text);
        self.modified = false;
        self.revision += 1;
        info!(target: "session", chars = self.buffer.len_chars(), "document_opened");
    }

    /// Drop the document. Undo/redo become no-ops until the next open.
    pub fn close_document(&mut self) {
        self.buffer.set_text("");
        self.buffer.take_changes();
        self.history.close_session();
        self.dismiss_completion();
        self.close_find_panel();
        self.modified = false;
        info!(target: "session", "document_closed");
    }

    /// Clear both history stacks and seed them with `initial_text`. Also
    /// drops any open completion popup and the find session.
    pub fn reset_history(&mut self, initial_text: &str) {
        self.history.reset_session(initial_text);
        self.dismiss_completion();
        self.close_find_panel();
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Bumped on every content change; the preview refresh signal.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn text(&self) -> String {
        self.buffer.full_text()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Pending transient status text, if any.
    pub fn take_status(&mut self) -> Option<String> {
        if let Some(status) = self.find.take_status() {
            self.status = Some(status.to_string());
        }
        self.status.take()
    }

    // ========== Change dispatch ==========

    /// Apply a user edit to the buffer and dispatch the resulting changes.
    pub fn edit<F>(&mut self, now: Instant, f: F)
    where
        F: FnOnce(&mut Buffer),
    {
        f(&mut self.buffer);
        self.settle(EditOrigin::User, now);
    }

    /// Move the cursor without touching content.
    pub fn move_cursor<F>(&mut self, now: Instant, f: F)
    where
        F: FnOnce(&mut Buffer),
    {
        f(&mut self.buffer);
        self.buffer.ensure_visible();
        self.on_cursor_moved(now);
    }

    /// Drain the buffer's change journal and notify the engines.
    pub fn settle(&mut self, origin: EditOrigin, now: Instant) {
        for kind in self.buffer.take_changes() {
            self.on_buffer_changed(kind, origin, now);
        }
        self.buffer.ensure_visible();
    }

    /// Notification for one content mutation.
    pub fn on_buffer_changed(&mut self, kind: ChangeKind, origin: EditOrigin, now: Instant) {
        if origin != EditOrigin::Restore {
            let text = self.buffer.full_text();
            self.history.record_edit(&text);
        }
        self.modified = true;
        self.revision += 1;
        trace!(target: "session", ?kind, ?origin, revision = self.revision, "buffer_changed");

        match (origin, kind) {
            (EditOrigin::User, ChangeKind::Insert) => self.schedule_completion(now),
            (EditOrigin::Completion, _) => {}
            _ => self.dismiss_completion(),
        }

        if origin != EditOrigin::Replace {
            if self.find.invalidate() {
                self.find_timer.schedule(now);
            } else {
                self.find_timer.cancel();
            }
        }
    }

    /// Re-evaluate completion after the cursor moved. Only an open popup (or
    /// one about to open) follows the cursor.
    pub fn on_cursor_moved(&mut self, now: Instant) {
        if self.completion.is_visible() || self.completion_timer.is_pending() {
            self.schedule_completion(now);
        }
    }

    fn schedule_completion(&mut self, now: Instant) {
        let cursor = self.buffer.cursor();
        let line = self.buffer.line_text(cursor.line);
        if extract_trigger(line_prefix(&line, cursor.col)).is_none() {
            self.dismiss_completion();
            return;
        }
        self.completion_timer.schedule(now);
    }

    /// Fire due debounce timers. Returns true when anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        if self.completion_timer.fire_if_due(now) {
            self.completion.refresh(&self.buffer);
            fired = true;
        }
        if self.find_timer.fire_if_due(now) {
            self.find.run_search(&mut self.buffer);
            fired = true;
        }
        fired
    }

    /// Earliest pending debounce deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.completion_timer.deadline(), self.find_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ========== Completion ==========

    pub fn completion(&self) -> &CompletionEngine {
        &self.completion
    }

    pub fn completion_visible(&self) -> bool {
        self.completion.is_visible()
    }

    /// Evaluate completion immediately, bypassing the debounce.
    pub fn force_completion(&mut self) {
        self.completion_timer.cancel();
        self.completion.refresh(&self.buffer);
    }

    pub fn accept_completion(&mut self, index: usize, now: Instant) -> bool {
        self.completion_timer.cancel();
        let accepted = self.completion.accept(index, &mut self.buffer);
        self.settle(EditOrigin::Completion, now);
        accepted
    }

    pub fn accept_selected_completion(&mut self, now: Instant) -> bool {
        match self.completion.selected_index {
            Some(index) => self.accept_completion(index, now),
            None => false,
        }
    }

    pub fn dismiss_completion(&mut self) {
        self.completion_timer.cancel();
        self.completion.hide();
    }

    pub fn move_completion_selection(&mut self, delta: isize) {
        self.completion.move_selection(delta);
    }

    // ========== Undo / redo ==========

    pub fn undo(&mut self, now: Instant) -> bool {
        let mut changes = Vec::new();
        let moved = self.history.undo(&mut self.buffer, |buf, history, text| {
            restore_snapshot(buf, history, text, &mut changes)
        });
        self.after_restore(moved, changes, "Undo", now)
    }

    pub fn redo(&mut self, now: Instant) -> bool {
        let mut changes = Vec::new();
        let moved = self.history.redo(&mut self.buffer, |buf, history, text| {
            restore_snapshot(buf, history, text, &mut changes)
        });
        self.after_restore(moved, changes, "Redo", now)
    }

    fn after_restore(
        &mut self,
        moved: bool,
        changes: Vec<ChangeKind>,
        label: &str,
        now: Instant,
    ) -> bool {
        if !moved {
            return false;
        }
        for kind in changes {
            self.on_buffer_changed(kind, EditOrigin::Restore, now);
        }
        self.buffer.ensure_visible();
        self.status = Some(label.to_string());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========== Find / replace ==========

    pub fn find(&self) -> &FindSession {
        &self.find
    }

    pub fn find_phase(&self) -> FindPhase {
        self.find.phase()
    }

    pub fn highlights(&self) -> Vec<(Match, bool)> {
        self.find.highlights()
    }

    pub fn open_find_panel(&mut self) {
        self.find.open();
        debug!(target: "find", "panel_opened");
    }

    pub fn close_find_panel(&mut self) {
        self.find_timer.cancel();
        if self.find.is_open() {
            debug!(target: "find", "panel_closed");
        }
        self.find.close();
        self.buffer.focus();
    }

    pub fn set_query(&mut self, query: &str, now: Instant) {
        if self.find.set_query(query) {
            self.find_timer.schedule(now);
        } else {
            self.find_timer.cancel();
        }
    }

    pub fn next(&mut self, now: Instant) {
        if !self.find.next(&mut self.buffer) {
            self.request_search(now);
        }
    }

    pub fn prev(&mut self, now: Instant) {
        if !self.find.prev(&mut self.buffer) {
            self.request_search(now);
        }
    }

    fn request_search(&mut self, now: Instant) {
        if self.find.request_jump() {
            self.find_timer.schedule(now);
        }
    }

    pub fn replace_one(&mut self, replacement: &str, now: Instant) -> bool {
        self.find_timer.cancel();
        let done = self.find.replace_one(&mut self.buffer, replacement);
        self.settle(EditOrigin::Replace, now);
        done
    }

    pub fn replace_all(&mut self, replacement: &str, now: Instant) -> bool {
        self.find_timer.cancel();
        let done = self.find.replace_all(&mut self.buffer, replacement);
        self.settle(EditOrigin::Replace, now);
        done
    }

    pub fn undo_last_replace(&mut self, now: Instant) -> bool {
        self.find_timer.cancel();
        let done = self.find.undo_replace(&mut self.buffer);
        self.settle(EditOrigin::Replace, now);
        done
    }

    pub fn undo_all_replacements(&mut self, now: Instant) -> bool {
        self.find_timer.cancel();
        let done = self.find.undo_all_replacements(&mut self.buffer);
        self.settle(EditOrigin::Replace, now);
        done
    }
}

/// Write a snapshot back into the buffer while history is suppressed, and
/// deliver the resulting notifications to it (they are declined).
fn restore_snapshot(buf: &mut Buffer, history: &mut History, text: &str, out: &mut Vec<ChangeKind>) {
    buf.set_text(text);
    for kind in buf.take_changes() {
        history.record_edit(text);
        out.push(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    fn session(text: &str) -> EditorSession {
        EditorSession::new(text, &EditorConfig::default())
    }

    fn type_text(s: &mut EditorSession, text: &str, now: Instant) {
        for ch in text.chars() {
            s.edit(now, |buf| buf.insert_text(&ch.to_string()));
        }
    }

    #[test]
    fn typing_is_recorded_and_undoable() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "ab", t0);
        assert!(s.is_modified());
        assert!(s.undo(t0));
        assert_eq!(s.text(), "a");
        assert_eq!(s.take_status().as_deref(), Some("Undo"));
        assert!(s.redo(t0));
        assert_eq!(s.text(), "ab");
        assert!(!s.redo(t0));
    }

    #[test]
    fn restores_do_not_grow_history() {
        let t0 = Instant::now();
        let mut s = session("x");
        type_text(&mut s, "y", t0);
        s.undo(t0);
        s.redo(t0);
        s.undo(t0);
        assert_eq!(s.text(), "x");
        assert!(!s.can_undo());
        assert!(s.can_redo());
    }

    #[test]
    fn completion_appears_after_debounce() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "<rec", t0);
        assert!(!s.completion_visible());
        assert_eq!(s.next_deadline(), Some(at(t0, 50)));
        assert!(!s.poll(at(t0, 49)));
        assert!(s.poll(at(t0, 50)));
        assert_eq!(s.completion().candidates.len(), 1);
        assert_eq!(s.completion().selected_index, Some(0));
    }

    #[test]
    fn rapid_typing_keeps_one_pending_evaluation() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "<c", t0);
        type_text(&mut s, "i", at(t0, 30));
        assert!(!s.poll(at(t0, 60)));
        assert!(s.poll(at(t0, 80)));
        // Recomputed from the live buffer: "<ci" only matches circle.
        assert_eq!(s.completion().candidates[0].label, "circle");
        assert_eq!(s.completion().candidates.len(), 1);
    }

    #[test]
    fn whitespace_hides_popup_immediately() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "<g", t0);
        s.poll(at(t0, 50));
        assert!(s.completion_visible());
        type_text(&mut s, " ", at(t0, 60));
        assert!(!s.completion_visible());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn deletion_hides_popup_without_reevaluating() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "<rect", t0);
        s.poll(at(t0, 50));
        s.edit(at(t0, 60), |buf| buf.backspace());
        assert!(!s.completion_visible());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn accepting_a_completion_is_one_undo_step() {
        let t0 = Instant::now();
        let mut s = session("");
        type_text(&mut s, "rec", t0);
        s.poll(at(t0, 50));
        assert!(s.accept_selected_completion(at(t0, 60)));
        assert!(s.text().starts_with("<rect x=\"0\""));
        assert!(!s.completion_visible());
        assert_eq!(s.next_deadline(), None);
        s.undo(at(t0, 70));
        assert_eq!(s.text(), "rec");
    }

    #[test]
    fn cursor_move_follows_open_popup_only() {
        let t0 = Instant::now();
        let mut s = session("<rect");
        s.move_cursor(t0, |buf| buf.move_to_line_end());
        assert_eq!(s.next_deadline(), None);

        s.force_completion();
        assert!(s.completion_visible());
        s.move_cursor(t0, |buf| buf.move_left());
        assert_eq!(s.next_deadline(), Some(at(t0, 50)));
        s.poll(at(t0, 50));
        // "<rec" still only matches rect.
        assert_eq!(s.completion().candidates.len(), 1);
        s.move_cursor(t0, |buf| buf.move_to_line_start());
        assert!(!s.completion_visible());
    }

    #[test]
    fn find_is_debounced_and_follows_edits() {
        let t0 = Instant::now();
        let mut s = session("ab ab ab");
        s.open_find_panel();
        s.set_query("ab", t0);
        assert_eq!(s.find_phase(), FindPhase::Searching);
        s.poll(at(t0, 299));
        assert_eq!(s.find_phase(), FindPhase::Searching);
        s.poll(at(t0, 300));
        assert_eq!(s.highlights().len(), 3);
        assert_eq!(s.take_status().as_deref(), Some("3 matches"));

        s.move_cursor(at(t0, 400), |buf| buf.set_cursor(Position::new(0, 8)));
        s.edit(at(t0, 400), |buf| buf.insert_text(" ab"));
        assert_eq!(s.find_phase(), FindPhase::Searching);
        s.poll(at(t0, 700));
        assert_eq!(s.highlights().len(), 4);
    }

    #[test]
    fn search_after_typing_leaves_selection_alone() {
        let t0 = Instant::now();
        let mut s = session("<svg>\n</svg>");
        s.open_find_panel();
        s.set_query("svg", t0);
        s.poll(at(t0, 300));
        assert_eq!(s.highlights().len(), 2);

        s.move_cursor(at(t0, 350), |buf| buf.set_cursor(Position::new(1, 6)));
        type_text(&mut s, "A", at(t0, 400));
        s.poll(at(t0, 800));
        assert_eq!(s.highlights().len(), 2);
        type_text(&mut s, "B", at(t0, 850));
        assert_eq!(s.text(), "<svg>\n</svg>AB");
    }

    #[test]
    fn next_without_matches_searches_again() {
        let t0 = Instant::now();
        let mut s = session("foo");
        s.open_find_panel();
        s.set_query("foo", t0);
        s.next(at(t0, 10));
        assert_eq!(s.next_deadline(), Some(at(t0, 310)));
        s.poll(at(t0, 310));
        assert_eq!(s.highlights().len(), 1);
    }

    #[test]
    fn replace_all_and_undo_replace() {
        let t0 = Instant::now();
        let mut s = session("foo bar foo");
        s.open_find_panel();
        s.set_query("foo", t0);
        s.poll(at(t0, 300));
        assert!(s.replace_all("baz", at(t0, 310)));
        assert_eq!(s.text(), "baz bar baz");
        assert_eq!(s.next_deadline(), None);
        assert!(s.undo_last_replace(at(t0, 320)));
        assert_eq!(s.text(), "foo bar foo");
        assert_eq!(s.highlights().len(), 2);
        assert_eq!(s.take_status().as_deref(), Some("Replacement undone"));
    }

    #[test]
    fn replace_is_ordinary_edit_for_main_history() {
        let t0 = Instant::now();
        let mut s = session("foo");
        s.open_find_panel();
        s.set_query("foo", t0);
        s.poll(at(t0, 300));
        s.replace_one("bar", at(t0, 310));
        assert_eq!(s.text(), "bar");
        s.undo(at(t0, 320));
        assert_eq!(s.text(), "foo");
        // The replace history is separate and still holds its snapshot.
        assert_eq!(s.find().replace_depth(), 1);
    }

    #[test]
    fn close_find_panel_clears_state() {
        let t0 = Instant::now();
        let mut s = session("ab");
        s.open_find_panel();
        s.set_query("ab", t0);
        s.close_find_panel();
        assert_eq!(s.find_phase(), FindPhase::Closed);
        assert_eq!(s.next_deadline(), None);
        assert!(s.highlights().is_empty());
    }

    #[test]
    fn open_document_resets_everything() {
        let t0 = Instant::now();
        let mut s = session("old");
        type_text(&mut s, "x", t0);
        let before = s.revision();
        s.open_document("<svg/>");
        assert_eq!(s.text(), "<svg/>");
        assert!(!s.is_modified());
        assert!(!s.can_undo());
        assert!(s.revision() > before);

        s.close_document();
        assert!(!s.undo(t0));
    }
}
