use std::collections::VecDeque;
use tracing::{debug, trace};

use super::buffer::TextBuffer;

/// Default number of snapshots kept on the undo stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo over whole-buffer snapshots.
///
/// The last entry of the undo stack is always the buffer content at the most
/// recent settle point; the first entry is the text the session was opened
/// with (until it is evicted by the size bound).
#[derive(Debug, Clone)]
pub struct History {
    pub(crate) undo_stack: VecDeque<String>,
    pub(crate) redo_stack: Vec<String>,
    max_size: usize,
    suppress_history: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            suppress_history: false,
        }
    }

    /// Clear both stacks and seed the undo stack with the opening text.
    pub fn reset_session(&mut self, initial_text: &str) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.undo_stack.push_back(initial_text.to_string());
        self.suppress_history = false;
        debug!(target: "history", len = initial_text.len(), "session_reset");
    }

    /// Forget everything; used when no document is open.
    pub fn close_session(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn is_open(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress_history
    }

    /// Record the buffer content after a change notification. Returns false
    /// when the change came from a restore and was not recorded.
    pub fn record_edit(&mut self, new_text: &str) -> bool {
        if self.suppress_history {
            trace!(target: "history", "record_suppressed");
            return false;
        }
        self.undo_stack.push_back(new_text.to_string());
        // Trim from front if exceeds max size - O(1) with VecDeque
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
        trace!(target: "history", depth = self.undo_stack.len(), "edit_recorded");
        true
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Step back one snapshot, restoring the buffer to the new top of the
    /// undo stack. `restore` performs the buffer write while recording is
    /// suppressed.
    pub fn undo<B, F>(&mut self, buf: &mut B, restore: F) -> bool
    where
        B: TextBuffer + ?Sized,
        F: FnOnce(&mut B, &mut Self, &str),
    {
        if self.undo_stack.len() <= 1 {
            return false;
        }
        self.redo_stack.push(buf.full_text());
        self.undo_stack.pop_back();
        let previous = match self.undo_stack.back() {
            Some(text) => text.clone(),
            None => return false,
        };
        self.restore_with(buf, &previous, restore);
        debug!(
            target: "history",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "undo"
        );
        true
    }

    /// Re-apply the most recently undone snapshot. The restored snapshot
    /// becomes the new top of the undo stack, so the top always mirrors the
    /// buffer once the restore settles.
    pub fn redo<B, F>(&mut self, buf: &mut B, restore: F) -> bool
    where
        B: TextBuffer + ?Sized,
        F: FnOnce(&mut B, &mut Self, &str),
    {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push_back(next.clone());
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
        self.restore_with(buf, &next, restore);
        debug!(
            target: "history",
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "redo"
        );
        true
    }

    fn restore_with<B, F>(&mut self, buf: &mut B, text: &str, restore: F)
    where
        B: TextBuffer + ?Sized,
        F: FnOnce(&mut B, &mut Self, &str),
    {
        self.suppress_history = true;
        restore(buf, self, text);
        self.suppress_history = false;
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Oldest retained snapshot.
    pub fn oldest(&self) -> Option<&str> {
        self.undo_stack.front().map(String::as_str)
    }

    /// Snapshot at the top of the undo stack.
    pub fn latest(&self) -> Option<&str> {
        self.undo_stack.back().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::Buffer;

    /// Mirrors what the session does: write the text, then deliver the
    /// resulting change notification back to the history.
    fn restore(buf: &mut Buffer, history: &mut History, text: &str) {
        buf.set_text(text);
        for _ in buf.take_changes() {
            history.record_edit(&buf.full_text());
        }
    }

    fn edit(buf: &mut Buffer, history: &mut History, text: &str) {
        buf.set_text(text);
        buf.take_changes();
        history.record_edit(text);
    }

    #[test]
    fn bounded_to_limit_with_fifo_eviction() {
        let mut history = History::new(100);
        history.reset_session("s0");
        for i in 1..=150 {
            history.record_edit(&format!("s{i}"));
        }
        // 151 snapshots in total (s0..s150); the last 100 survive.
        assert_eq!(history.undo_depth(), 100);
        assert_eq!(history.oldest(), Some("s51"));
        assert_eq!(history.latest(), Some("s150"));
    }

    #[test]
    fn undo_twice_redo_twice_restores_latest() {
        let mut buf = Buffer::with_text("S0");
        let mut history = History::default();
        history.reset_session("S0");
        edit(&mut buf, &mut history, "S1");
        edit(&mut buf, &mut history, "S2");

        assert!(history.undo(&mut buf, restore));
        assert_eq!(buf.full_text(), "S1");
        assert!(history.undo(&mut buf, restore));
        assert_eq!(buf.full_text(), "S0");
        assert!(!history.undo(&mut buf, restore));

        assert!(history.redo(&mut buf, restore));
        assert_eq!(buf.full_text(), "S1");
        assert!(history.redo(&mut buf, restore));
        assert_eq!(buf.full_text(), "S2");
        assert!(!history.redo(&mut buf, restore));
        assert_eq!(history.latest(), Some("S2"));
    }

    #[test]
    fn undo_after_redo_steps_back_one_snapshot() {
        let mut buf = Buffer::with_text("S0");
        let mut history = History::default();
        history.reset_session("S0");
        edit(&mut buf, &mut history, "S1");
        edit(&mut buf, &mut history, "S2");

        history.undo(&mut buf, restore);
        history.redo(&mut buf, restore);
        assert_eq!(buf.full_text(), "S2");
        history.undo(&mut buf, restore);
        assert_eq!(buf.full_text(), "S1");
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn new_edit_after_undo_discards_redo() {
        let mut buf = Buffer::with_text("S0");
        let mut history = History::default();
        history.reset_session("S0");
        edit(&mut buf, &mut history, "S1");
        edit(&mut buf, &mut history, "S2");

        history.undo(&mut buf, restore);
        edit(&mut buf, &mut history, "S3");
        assert!(!history.redo(&mut buf, restore));
        assert_eq!(buf.full_text(), "S3");
    }

    #[test]
    fn record_edit_always_clears_redo() {
        let mut history = History::default();
        history.reset_session("a");
        history.redo_stack = vec!["x".into(), "y".into()];
        assert!(history.record_edit("b"));
        assert!(!history.can_redo());
    }

    #[test]
    fn restore_is_not_recorded() {
        let mut buf = Buffer::with_text("S0");
        let mut history = History::default();
        history.reset_session("S0");
        edit(&mut buf, &mut history, "S1");
        history.undo(&mut buf, restore);
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 1);
        assert!(!history.is_suppressed());
    }

    #[test]
    fn undo_without_session_is_noop() {
        let mut buf = Buffer::with_text("text");
        let mut history = History::default();
        assert!(!history.undo(&mut buf, restore));
        assert!(!history.redo(&mut buf, restore));
        assert_eq!(buf.full_text(), "text");
    }
}
