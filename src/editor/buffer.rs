use ropey::Rope;
use std::collections::VecDeque;

use super::position::Position;

/// Kind of content mutation raised by a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Text was inserted (possibly replacing a span).
    Insert,
    /// Text was removed with nothing put in its place.
    Delete,
    /// The whole document was replaced.
    Reset,
}

/// The operations the editor session needs from a text widget.
pub trait TextBuffer {
    fn full_text(&self) -> String;
    fn cursor(&self) -> Position;
    fn set_cursor(&mut self, pos: Position);
    fn line_count(&self) -> usize;
    /// Line content without its trailing newline. Empty for lines past the end.
    fn line_text(&self, line: usize) -> String;
    fn replace_range(&mut self, from: Position, to: Position, text: &str);
    fn set_text(&mut self, text: &str);
    fn set_selection(&mut self, from: Position, to: Position);
    fn selection(&self) -> Option<(Position, Position)>;
    fn scroll_into_view(&mut self, pos: Position);
    fn focus(&mut self);
    fn offset_of(&self, pos: Position) -> usize;
    fn position_of(&self, offset: usize) -> Position;
}

/// Rope-backed text buffer with a cursor, a selection and a change journal.
#[derive(Debug, Clone)]
pub struct Buffer {
    text: Rope,
    cursor: Position,
    anchor: Option<Position>,
    pub scroll_offset: usize,
    pub visible_height: usize,
    pub focused: bool,
    changes: VecDeque<ChangeKind>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(content: &str) -> Self {
        Self {
            text: Rope::from_str(content),
            cursor: Position::default(),
            anchor: None,
            scroll_offset: 0,
            visible_height: 20,
            focused: true,
            changes: VecDeque::new(),
        }
    }

    /// Drain the change notifications raised since the last call.
    pub fn take_changes(&mut self) -> Vec<ChangeKind> {
        self.changes.drain(..).collect()
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.text.len_lines() {
            return 0;
        }
        let slice = self.text.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn clamp(&self, pos: Position) -> Position {
        let last_line = self.text.len_lines().saturating_sub(1);
        let line = pos.line.min(last_line);
        Position::new(line, pos.col.min(self.line_len(line)))
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    // ========== Editing primitives used by the shell ==========

    /// Insert text at the cursor, replacing the selection if there is one.
    pub fn insert_text(&mut self, text: &str) {
        let (from, to) = self.selection().unwrap_or((self.cursor, self.cursor));
        self.replace_range(from, to, text);
    }

    pub fn backspace(&mut self) {
        if let Some((from, to)) = self.selection() {
            self.replace_range(from, to, "");
            return;
        }
        let offset = self.offset_of(self.cursor);
        if offset == 0 {
            return;
        }
        let from = self.position_of(offset - 1);
        self.replace_range(from, self.cursor, "");
    }

    pub fn delete_forward(&mut self) {
        if let Some((from, to)) = self.selection() {
            self.replace_range(from, to, "");
            return;
        }
        let offset = self.offset_of(self.cursor);
        if offset >= self.len_chars() {
            return;
        }
        let to = self.position_of(offset + 1);
        self.replace_range(self.cursor, to, "");
    }

    // ========== Cursor movement ==========

    pub fn move_left(&mut self) {
        let offset = self.offset_of(self.cursor);
        self.anchor = None;
        self.cursor = self.position_of(offset.saturating_sub(1));
    }

    pub fn move_right(&mut self) {
        let offset = self.offset_of(self.cursor);
        self.anchor = None;
        self.cursor = self.position_of(offset + 1);
    }

    pub fn move_up(&mut self) {
        self.anchor = None;
        if self.cursor.line > 0 {
            self.cursor = self.clamp(Position::new(self.cursor.line - 1, self.cursor.col));
        }
    }

    pub fn move_down(&mut self) {
        self.anchor = None;
        self.cursor = self.clamp(Position::new(self.cursor.line + 1, self.cursor.col));
    }

    pub fn move_to_line_start(&mut self) {
        self.anchor = None;
        self.cursor.col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.anchor = None;
        self.cursor.col = self.line_len(self.cursor.line);
    }

    /// Keep the cursor line inside the viewport.
    pub fn ensure_visible(&mut self) {
        let height = self.visible_height.max(1);
        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        } else if self.cursor.line >= self.scroll_offset + height {
            self.scroll_offset = self.cursor.line + 1 - height;
        }
    }
}

impl TextBuffer for Buffer {
    fn full_text(&self) -> String {
        self.text.to_string()
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, pos: Position) {
        self.anchor = None;
        self.cursor = self.clamp(pos);
    }

    fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    fn line_text(&self, line: usize) -> String {
        if line >= self.text.len_lines() {
            return String::new();
        }
        let s = self.text.line(line).to_string();
        s.trim_end_matches('\n').to_string()
    }

    fn replace_range(&mut self, from: Position, to: Position, text: &str) {
        let start = self.offset_of(from);
        let end = self.offset_of(to).max(start);
        if start == end && text.is_empty() {
            return;
        }
        self.text.remove(start..end);
        self.text.insert(start, text);
        self.anchor = None;
        self.cursor = self.position_of(start + text.chars().count());
        self.changes.push_back(if text.is_empty() {
            ChangeKind::Delete
        } else {
            ChangeKind::Insert
        });
    }

    fn set_text(&mut self, text: &str) {
        self.text = Rope::from_str(text);
        self.anchor = None;
        self.cursor = self.clamp(self.cursor);
        self.changes.push_back(ChangeKind::Reset);
    }

    fn set_selection(&mut self, from: Position, to: Position) {
        let from = self.clamp(from);
        let to = self.clamp(to);
        self.anchor = if from == to { None } else { Some(from) };
        self.cursor = to;
    }

    fn selection(&self) -> Option<(Position, Position)> {
        let anchor = self.anchor?;
        if anchor <= self.cursor {
            Some((anchor, self.cursor))
        } else {
            Some((self.cursor, anchor))
        }
    }

    fn scroll_into_view(&mut self, pos: Position) {
        let height = self.visible_height.max(1);
        if pos.line < self.scroll_offset {
            self.scroll_offset = pos.line;
        } else if pos.line >= self.scroll_offset + height {
            // Centre the target line the way a jump-to-match should.
            self.scroll_offset = pos.line.saturating_sub(height / 2);
        }
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn offset_of(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        self.text.line_to_char(pos.line) + pos.col
    }

    fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len_chars());
        let line = self.text.char_to_line(offset);
        Position::new(line, offset - self.text.line_to_char(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_range_journals_change_kind() {
        let mut buf = Buffer::with_text("<svg></svg>");
        buf.replace_range(Position::new(0, 5), Position::new(0, 5), "<g/>");
        buf.replace_range(Position::new(0, 5), Position::new(0, 9), "");
        assert_eq!(
            buf.take_changes(),
            vec![ChangeKind::Insert, ChangeKind::Delete]
        );
        assert!(!buf.has_pending_changes());
        assert_eq!(buf.full_text(), "<svg></svg>");
    }

    #[test]
    fn replace_range_moves_cursor_past_insertion() {
        let mut buf = Buffer::with_text("a\nb");
        buf.replace_range(Position::new(1, 0), Position::new(1, 0), "xy\nz");
        assert_eq!(buf.full_text(), "a\nxy\nzb");
        assert_eq!(buf.cursor(), Position::new(2, 1));
    }

    #[test]
    fn line_text_strips_newline() {
        let buf = Buffer::with_text("one\ntwo\n");
        assert_eq!(buf.line_text(0), "one");
        assert_eq!(buf.line_text(2), "");
        assert_eq!(buf.line_text(9), "");
    }

    #[test]
    fn offset_conversion_agrees_with_position_helpers() {
        let text = "<svg>\n  <矩形 x=\"0\"/>\n</svg>";
        let buf = Buffer::with_text(text);
        for offset in 0..=text.chars().count() {
            let pos = buf.position_of(offset);
            assert_eq!(pos, Position::from_offset(text, offset));
            assert_eq!(buf.offset_of(pos), offset);
            assert_eq!(pos.to_offset(text), offset);
        }
    }

    #[test]
    fn selection_is_normalised() {
        let mut buf = Buffer::with_text("hello world");
        buf.set_selection(Position::new(0, 6), Position::new(0, 11));
        assert_eq!(
            buf.selection(),
            Some((Position::new(0, 6), Position::new(0, 11)))
        );
        buf.insert_text("there");
        assert_eq!(buf.full_text(), "hello there");
        assert_eq!(buf.selection(), None);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut buf = Buffer::with_text("ab\ncd");
        buf.set_cursor(Position::new(1, 0));
        buf.backspace();
        assert_eq!(buf.full_text(), "abcd");
        assert_eq!(buf.cursor(), Position::new(0, 2));
    }

    #[test]
    fn set_text_clamps_cursor_and_journals_reset() {
        let mut buf = Buffer::with_text("long line here");
        buf.set_cursor(Position::new(0, 14));
        buf.set_text("ab");
        assert_eq!(buf.cursor(), Position::new(0, 2));
        assert_eq!(buf.take_changes(), vec![ChangeKind::Reset]);
    }
}
