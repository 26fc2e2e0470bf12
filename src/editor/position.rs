/// A cursor location: zero-based line and column, where the column counts chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Char offset of this position inside `text`, clamped to the line end
    /// and to the end of the document.
    pub fn to_offset(self, text: &str) -> usize {
        let mut offset = 0;
        for (idx, line) in text.split('\n').enumerate() {
            let len = line.chars().count();
            if idx == self.line {
                return offset + self.col.min(len);
            }
            offset += len + 1;
        }
        text.chars().count()
    }

    /// Position of a char offset inside `text`. Offsets past the end clamp to
    /// the last position of the document.
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut pos = Position::default();
        for (idx, ch) in text.chars().enumerate() {
            if idx == offset {
                return pos;
            }
            if ch == '\n' {
                pos.line += 1;
                pos.col = 0;
            } else {
                pos.col += 1;
            }
        }
        pos
    }
}

/// Convert a byte index inside `s` to a char index.
pub fn char_index_at_byte(s: &str, byte_idx: usize) -> usize {
    let mut byte_idx = byte_idx.min(s.len());
    while !s.is_char_boundary(byte_idx) {
        byte_idx -= 1;
    }
    s[..byte_idx].chars().count()
}

/// Convert a char index inside `s` to a byte index.
pub fn byte_index_of_char(s: &str, char_idx: usize) -> usize {
    match s.char_indices().nth(char_idx) {
        Some((b, _)) => b,
        None => s.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_round_trips_through_lines() {
        let text = "<svg>\n  <rect/>\n</svg>";
        let pos = Position::new(1, 3);
        let offset = pos.to_offset(text);
        assert_eq!(offset, 9);
        assert_eq!(Position::from_offset(text, offset), pos);
    }

    #[test]
    fn column_clamps_to_line_end() {
        let text = "ab\ncd";
        assert_eq!(Position::new(0, 10).to_offset(text), 2);
        assert_eq!(Position::new(7, 0).to_offset(text), 5);
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let text = "填充\nx";
        assert_eq!(Position::new(1, 0).to_offset(text), 3);
        assert_eq!(Position::from_offset(text, 2), Position::new(0, 2));
        assert_eq!(char_index_at_byte(text, 6), 2);
        assert_eq!(byte_index_of_char(text, 1), 3);
    }

    #[test]
    fn offset_past_end_clamps() {
        assert_eq!(Position::from_offset("ab\nc", 99), Position::new(1, 1));
    }
}
