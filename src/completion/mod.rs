//! Context-sensitive completion for SVG markup.
//!
//! Resolution maps the token before the cursor to a list of candidates;
//! acceptance decides the replacement span, decorates the inserted text and
//! selects the first quoted value so it can be typed over immediately.

pub mod catalog;
pub mod trigger;

use tracing::debug;

use crate::editor::buffer::TextBuffer;
use crate::editor::position::Position;
use catalog::{AliasTarget, Template, ALIASES, SVG_ATTRIBUTES, SVG_TAGS};
use trigger::{attribute_value_context, extract_trigger, line_prefix, Trigger};

/// Default cap on the number of candidates in one list.
pub const DEFAULT_MAX_COMPLETIONS: usize = 15;

const MAX_VISIBLE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Element,
    Attribute,
    Color,
}

impl CandidateKind {
    pub fn icon(&self) -> &'static str {
        match self {
            CandidateKind::Element => "E",
            CandidateKind::Attribute => "A",
            CandidateKind::Color => "C",
        }
    }
}

/// One possible insertion offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub insertion_text: String,
    pub description: String,
    pub kind: CandidateKind,
}

impl CompletionCandidate {
    fn from_template(template: &Template, kind: CandidateKind) -> Self {
        Self {
            label: template.label.to_string(),
            insertion_text: template.snippet.to_string(),
            description: template.description.to_string(),
            kind,
        }
    }

    /// Same insertion, shown under a localized label.
    fn relabeled(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }
}

/// Popup state plus the resolution rules.
#[derive(Debug, Clone)]
pub struct CompletionEngine {
    pub candidates: Vec<CompletionCandidate>,
    pub selected_index: Option<usize>,
    pub scroll_offset: usize,
    max_completions: usize,
}

impl Default for CompletionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPLETIONS)
    }
}

impl CompletionEngine {
    pub fn new(max_completions: usize) -> Self {
        Self {
            candidates: Vec::new(),
            selected_index: None,
            scroll_offset: 0,
            max_completions: max_completions.max(1),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.selected_index.is_some()
    }

    /// Show `candidates`, or hide the popup when there are none.
    pub fn show(&mut self, candidates: Vec<CompletionCandidate>) {
        if candidates.is_empty() {
            self.hide();
            return;
        }
        self.candidates = candidates;
        self.selected_index = Some(0);
        self.scroll_offset = 0;
    }

    pub fn hide(&mut self) {
        self.candidates.clear();
        self.selected_index = None;
        self.scroll_offset = 0;
    }

    /// Move the selection by `delta`, clamped to the list bounds.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(current) = self.selected_index else {
            return;
        };
        let last = self.candidates.len().saturating_sub(1) as isize;
        let next = (current as isize + delta).clamp(0, last);
        self.selected_index = Some(next as usize);
        self.adjust_scroll();
    }

    fn adjust_scroll(&mut self) {
        let Some(selected) = self.selected_index else {
            return;
        };
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        } else if selected >= self.scroll_offset + MAX_VISIBLE {
            self.scroll_offset = selected + 1 - MAX_VISIBLE;
        }
    }

    pub fn selected(&self) -> Option<&CompletionCandidate> {
        self.candidates.get(self.selected_index?)
    }

    /// Window of candidates the popup draws.
    pub fn visible_candidates(&self) -> &[CompletionCandidate] {
        let end = (self.scroll_offset + MAX_VISIBLE).min(self.candidates.len());
        &self.candidates[self.scroll_offset.min(end)..end]
    }

    /// Selected row inside `visible_candidates`.
    pub fn visible_selected(&self) -> Option<usize> {
        self.selected_index
            .map(|idx| idx.saturating_sub(self.scroll_offset))
    }

    /// Recompute the list from the live buffer at its cursor.
    pub fn refresh<B: TextBuffer + ?Sized>(&mut self, buf: &B) {
        let cursor = buf.cursor();
        let line = buf.line_text(cursor.line);
        let prefix = line_prefix(&line, cursor.col);
        let candidates = match extract_trigger(prefix) {
            Some(trigger) => self.resolve(&trigger, prefix),
            None => Vec::new(),
        };
        debug!(target: "completion", count = candidates.len(), "refresh");
        self.show(candidates);
    }

    /// Candidates for `trigger`, given the line content before the cursor.
    pub fn resolve(&self, trigger: &Trigger, prefix: &str) -> Vec<CompletionCandidate> {
        if let Some((attr, partial)) = attribute_value_context(prefix) {
            if catalog::is_color_attribute(attr) {
                return color_candidates(partial);
            }
        }

        if trigger.is_localized() {
            return self.localized_candidates(&trigger.text);
        }

        match trigger.marker {
            Some(_) => tags_with_prefix(trigger.word()),
            None if trigger.text.chars().all(|c| c.is_ascii_alphabetic()) => {
                let mut out = tags_with_prefix(&trigger.text);
                out.extend(
                    SVG_ATTRIBUTES
                        .iter()
                        .filter(|attr| starts_with_ignore_case(attr.label, &trigger.text))
                        .map(|attr| CompletionCandidate::from_template(attr, CandidateKind::Attribute)),
                );
                out.truncate(self.max_completions);
                out
            }
            None => Vec::new(),
        }
    }

    fn localized_candidates(&self, term: &str) -> Vec<CompletionCandidate> {
        if let Some(target) = catalog::lookup_alias(term) {
            return match target {
                AliasTarget::Name(name) => canonical(name).into_iter().take(1).collect(),
                AliasTarget::Color(_) => Vec::new(),
            };
        }

        let mut out = Vec::new();
        for (alias, target) in ALIASES {
            if !alias.starts_with(term) {
                continue;
            }
            if let AliasTarget::Name(name) = target {
                out.extend(canonical(name).into_iter().map(|c| c.relabeled(alias)));
            }
        }
        out.truncate(self.max_completions);
        out
    }

    /// Insert candidate `index` at the buffer's cursor. Returns false when
    /// there is no such candidate. The popup is hidden either way.
    pub fn accept<B: TextBuffer + ?Sized>(&mut self, index: usize, buf: &mut B) -> bool {
        let Some(candidate) = self.candidates.get(index).cloned() else {
            self.hide();
            return false;
        };
        self.hide();

        let cursor = buf.cursor();
        let line = buf.line_text(cursor.line);
        let prefix = line_prefix(&line, cursor.col);
        let trigger = extract_trigger(prefix);

        let word_len = trigger.as_ref().map_or(0, Trigger::word_len);
        let start = Position::new(cursor.line, cursor.col.saturating_sub(word_len));
        let closing = trigger.as_ref().and_then(|t| t.marker) == Some('/');

        let text = if closing {
            format!("{}>", candidate.label)
        } else if candidate.kind == CandidateKind::Element
            && !line_prefix(&line, start.col).contains('<')
        {
            format!("<{}", candidate.insertion_text)
        } else {
            candidate.insertion_text.clone()
        };

        buf.replace_range(start, cursor, &text);
        debug!(target: "completion", label = %candidate.label, "accepted");

        let inserted_line = buf.line_text(start.line);
        match quoted_span(&inserted_line, start.col) {
            Some((from, to)) => {
                buf.set_selection(Position::new(start.line, from), Position::new(start.line, to))
            }
            None => {
                let end = buf.cursor();
                buf.set_cursor(end);
            }
        }
        buf.scroll_into_view(buf.cursor());
        buf.focus();
        true
    }
}

fn starts_with_ignore_case(label: &str, prefix: &str) -> bool {
    label.to_lowercase().starts_with(&prefix.to_lowercase())
}

fn tags_with_prefix(prefix: &str) -> Vec<CompletionCandidate> {
    SVG_TAGS
        .iter()
        .filter(|tag| starts_with_ignore_case(tag.label, prefix))
        .map(|tag| CompletionCandidate::from_template(tag, CandidateKind::Element))
        .collect()
}

/// Element first, then attribute, for a canonical name.
fn canonical(name: &str) -> Vec<CompletionCandidate> {
    let element = catalog::find_tag(name)
        .map(|tag| CompletionCandidate::from_template(tag, CandidateKind::Element));
    let attribute = catalog::find_attribute(name)
        .map(|attr| CompletionCandidate::from_template(attr, CandidateKind::Attribute));
    element.into_iter().chain(attribute).collect()
}

fn color_candidates(partial: &str) -> Vec<CompletionCandidate> {
    ALIASES
        .iter()
        .filter_map(|(alias, target)| match target {
            AliasTarget::Color(keyword) if alias.starts_with(partial) => Some(CompletionCandidate {
                label: alias.to_string(),
                insertion_text: keyword.to_string(),
                description: format!("{keyword} color"),
                kind: CandidateKind::Color,
            }),
            _ => None,
        })
        .collect()
}

/// Char columns of the first quoted span on `line` at or after `from`,
/// trying double quotes before single quotes.
fn quoted_span(line: &str, from: usize) -> Option<(usize, usize)> {
    let chars: Vec<char> = line.chars().collect();
    ['"', '\''].into_iter().find_map(|quote| {
        let open = (from..chars.len()).find(|&i| chars[i] == quote)?;
        let close = (open + 1..chars.len()).find(|&i| chars[i] == quote)?;
        Some((open + 1, close))
    })
}
