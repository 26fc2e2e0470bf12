use std::fmt;

use regex::Regex;
use tracing::{debug, info, warn};

use super::buffer::TextBuffer;
use super::position::char_index_at_byte;

/// One located occurrence of the query, in char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub length: usize,
}

impl Match {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindPhase {
    Closed,
    /// Open with an empty query.
    Idle,
    /// A re-search is pending.
    Searching,
    Matches,
    NoMatches,
}

/// Transient text reported to the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindStatus {
    NoMatches { query: String },
    Matches { count: usize },
    At { index: usize, count: usize },
    Replaced { query: String, remaining: usize },
    ReplacedAll {
        query: String,
        replacement: String,
        remaining: usize,
    },
    ReplaceUndone,
    AllReplacementsUndone,
}

impl fmt::Display for FindStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindStatus::NoMatches { query } => write!(f, "No matches for \"{query}\""),
            FindStatus::Matches { count: 1 } => write!(f, "1 match"),
            FindStatus::Matches { count } => write!(f, "{count} matches"),
            FindStatus::At { index, count } => write!(f, "{}/{}", index + 1, count),
            FindStatus::Replaced { query, remaining: 0 } => write!(f, "Replaced \"{query}\""),
            FindStatus::Replaced { remaining, .. } => write!(f, "Replaced, {remaining} left"),
            FindStatus::ReplacedAll {
                query,
                replacement,
                remaining: 0,
            } => write!(f, "Replaced all \"{query}\" with \"{replacement}\""),
            FindStatus::ReplacedAll {
                query, remaining, ..
            } => write!(f, "Replaced all \"{query}\", {remaining} still match"),
            FindStatus::ReplaceUndone => write!(f, "Replacement undone"),
            FindStatus::AllReplacementsUndone => write!(f, "All replacements undone"),
        }
    }
}

/// All non-overlapping literal occurrences of `query` in `text`, left to right.
pub fn find_all(text: &str, query: &str) -> Vec<Match> {
    if query.is_empty() {
        return Vec::new();
    }
    let re = match Regex::new(&regex::escape(query)) {
        Ok(re) => re,
        Err(err) => {
            warn!(target: "find", error = %err, "query rejected");
            return Vec::new();
        }
    };

    let mut matches = Vec::new();
    let mut last_byte = 0;
    let mut last_char = 0;
    for m in re.find_iter(text) {
        last_char += char_index_at_byte(&text[last_byte..], m.start() - last_byte);
        last_byte = m.start();
        matches.push(Match {
            offset: last_char,
            length: m.as_str().chars().count(),
        });
    }
    matches
}

/// Find/replace state for one document.
#[derive(Debug, Clone, Default)]
pub struct FindSession {
    open: bool,
    query: String,
    pub matches: Vec<Match>,
    pub current: usize,
    pending: bool,
    /// Whether the pending search should move the selection to the first
    /// match. Only query changes and navigation ask for it.
    jump_pending: bool,
    replace_history: Vec<String>,
    status: Option<FindStatus>,
}

impl FindSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close the panel, dropping the query, the matches and their decorations.
    /// Replace history survives.
    pub fn close(&mut self) {
        self.open = false;
        self.query.clear();
        self.matches.clear();
        self.current = 0;
        self.pending = false;
        self.jump_pending = false;
        self.status = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Store a new query. Returns true when a search should be scheduled.
    pub fn set_query(&mut self, query: &str) -> bool {
        self.query = query.trim().to_string();
        self.jump_pending = true;
        self.invalidate()
    }

    /// Like `invalidate`, but the search that follows jumps to the first match.
    pub fn request_jump(&mut self) -> bool {
        self.jump_pending = true;
        self.invalidate()
    }

    /// Drop stale matches after the buffer changed underneath them. Returns
    /// true when a search should be scheduled.
    pub fn invalidate(&mut self) -> bool {
        self.matches.clear();
        self.current = 0;
        self.pending = self.open && !self.query.is_empty();
        if self.query.is_empty() {
            self.status = None;
        }
        self.pending
    }

    pub fn phase(&self) -> FindPhase {
        if !self.open {
            FindPhase::Closed
        } else if self.pending {
            FindPhase::Searching
        } else if self.query.is_empty() {
            FindPhase::Idle
        } else if self.matches.is_empty() {
            FindPhase::NoMatches
        } else {
            FindPhase::Matches
        }
    }

    pub fn replace_depth(&self) -> usize {
        self.replace_history.len()
    }

    pub fn status(&self) -> Option<&FindStatus> {
        self.status.as_ref()
    }

    pub fn take_status(&mut self) -> Option<FindStatus> {
        self.status.take()
    }

    /// Every match, with the current one flagged. Empty when closed.
    pub fn highlights(&self) -> Vec<(Match, bool)> {
        if !self.open {
            return Vec::new();
        }
        self.matches
            .iter()
            .enumerate()
            .map(|(i, m)| (*m, i == self.current))
            .collect()
    }

    /// Rebuild matches from the whole buffer. Jumps to the first match only
    /// when the query changed or navigation asked for it; a search caused by
    /// an edit leaves the cursor and selection alone.
    pub fn run_search<B: TextBuffer + ?Sized>(&mut self, buf: &mut B) {
        let jump = std::mem::take(&mut self.jump_pending);
        self.search(buf, jump);
    }

    fn search<B: TextBuffer + ?Sized>(&mut self, buf: &mut B, jump: bool) {
        self.pending = false;
        self.matches.clear();
        self.current = 0;
        if self.query.is_empty() {
            self.status = None;
            return;
        }

        self.matches = find_all(&buf.full_text(), &self.query);
        debug!(target: "find", query = %self.query, count = self.matches.len(), "search");
        if self.matches.is_empty() {
            self.status = Some(FindStatus::NoMatches {
                query: self.query.clone(),
            });
            return;
        }
        if jump {
            self.jump(buf, 0);
        }
        self.status = Some(FindStatus::Matches {
            count: self.matches.len(),
        });
    }

    /// Advance with wraparound. Returns false when there are no matches and a
    /// fresh search is needed instead.
    pub fn next<B: TextBuffer + ?Sized>(&mut self, buf: &mut B) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        let index = (self.current + 1) % self.matches.len();
        self.jump(buf, index);
        true
    }

    pub fn prev<B: TextBuffer + ?Sized>(&mut self, buf: &mut B) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        let len = self.matches.len();
        let index = (self.current + len - 1) % len;
        self.jump(buf, index);
        true
    }

    fn jump<B: TextBuffer + ?Sized>(&mut self, buf: &mut B, index: usize) {
        let Some(m) = self.matches.get(index).copied() else {
            return;
        };
        self.current = index;
        let from = buf.position_of(m.offset);
        let to = buf.position_of(m.end());
        buf.focus();
        buf.set_selection(from, to);
        buf.scroll_into_view(from);
        self.status = Some(FindStatus::At {
            index,
            count: self.matches.len(),
        });
    }

    /// Replace the current match. No-op without an active match.
    pub fn replace_one<B: TextBuffer + ?Sized>(&mut self, buf: &mut B, replacement: &str) -> bool {
        let Some(m) = self.matches.get(self.current).copied() else {
            return false;
        };
        if self.query.is_empty() {
            return false;
        }
        self.replace_history.push(buf.full_text());
        let from = buf.position_of(m.offset);
        let to = buf.position_of(m.end());
        buf.replace_range(from, to, replacement);

        self.pending = false;
        self.jump_pending = false;
        self.matches = find_all(&buf.full_text(), &self.query);
        if self.matches.is_empty() {
            self.current = 0;
        } else {
            let index = self.current.min(self.matches.len() - 1);
            self.jump(buf, index);
        }
        self.status = Some(FindStatus::Replaced {
            query: self.query.clone(),
            remaining: self.matches.len(),
        });
        debug!(target: "find", remaining = self.matches.len(), "replace_one");
        true
    }

    /// Literal global substitution in one step.
    pub fn replace_all<B: TextBuffer + ?Sized>(&mut self, buf: &mut B, replacement: &str) -> bool {
        if self.query.is_empty() {
            return false;
        }
        let before = buf.full_text();
        let after = before.replace(&self.query, replacement);
        let changed = after != before;
        self.replace_history.push(before);
        if changed {
            buf.set_text(&after);
        }
        self.search(buf, true);
        info!(target: "find", query = %self.query, changed, remaining = self.matches.len(), "replace_all");
        self.status = Some(FindStatus::ReplacedAll {
            query: self.query.clone(),
            replacement: replacement.to_string(),
            remaining: self.matches.len(),
        });
        true
    }

    /// Restore the snapshot taken before the most recent replacement.
    pub fn undo_replace<B: TextBuffer + ?Sized>(&mut self, buf: &mut B) -> bool {
        let Some(previous) = self.replace_history.pop() else {
            return false;
        };
        restore(buf, &previous);
        self.search(buf, true);
        self.status = Some(FindStatus::ReplaceUndone);
        true
    }

    /// Restore the text from before the first replacement and forget the
    /// rest of the replace history.
    pub fn undo_all_replacements<B: TextBuffer + ?Sized>(&mut self, buf: &mut B) -> bool {
        if self.replace_history.is_empty() {
            return false;
        }
        let original = self.replace_history.swap_remove(0);
        self.replace_history.clear();
        restore(buf, &original);
        self.search(buf, true);
        self.status = Some(FindStatus::AllReplacementsUndone);
        info!(target: "find", "all_replacements_undone");
        true
    }
}

fn restore<B: TextBuffer + ?Sized>(buf: &mut B, text: &str) {
    if buf.full_text() != text {
        buf.set_text(text);
    }
}
