use regex::Regex;
use std::sync::LazyLock;

static TRAILING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w-]+$").expect("valid trailing word regex"));

static OPEN_ATTRIBUTE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-zA-Z-]+)="([^"]*)$"#).expect("valid attribute regex"));

/// Characters that may appear in a trigger word, in any script.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// The token immediately before the cursor that keys completion lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Full token including a leading `<` or `/` marker.
    pub text: String,
    /// Leading marker, if any.
    pub marker: Option<char>,
}

impl Trigger {
    /// The token with its marker stripped.
    pub fn word(&self) -> &str {
        match self.marker {
            Some(m) => &self.text[m.len_utf8()..],
            None => &self.text,
        }
    }

    /// Number of chars the accepted candidate replaces.
    pub fn word_len(&self) -> usize {
        self.word().chars().count()
    }

    pub fn is_localized(&self) -> bool {
        !self.text.is_ascii()
    }
}

/// Extract the trigger token from `prefix`, the line content before the
/// cursor. Returns `None` when there is nothing to complete.
pub fn extract_trigger(prefix: &str) -> Option<Trigger> {
    let mut start = prefix.len();
    let mut marker = None;
    for (idx, c) in prefix.char_indices().rev() {
        if c == '<' || c == '/' {
            marker = Some(c);
            start = idx;
            break;
        }
        if !is_word_char(c) {
            break;
        }
        start = idx;
    }

    if start < prefix.len() {
        return Some(Trigger {
            text: prefix[start..].to_string(),
            marker,
        });
    }

    TRAILING_WORD.find(prefix).map(|m| Trigger {
        text: m.as_str().to_string(),
        marker: None,
    })
}

/// Open attribute value before the cursor: `(attribute name, partial value)`.
pub fn attribute_value_context(prefix: &str) -> Option<(&str, &str)> {
    let caps = OPEN_ATTRIBUTE_VALUE.captures(prefix)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some((name, value))
}

/// Line content before `col` (a char column).
pub fn line_prefix(line: &str, col: usize) -> &str {
    &line[..crate::editor::position::byte_index_of_char(line, col)]
}
