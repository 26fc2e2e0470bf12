use crate::theme::MarkupColors;
use ratatui::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Tag,
    Attribute,
    Value,
    Punctuation,
    Comment,
    Plain,
}

impl TokenType {
    pub fn style(self, colors: &MarkupColors) -> Option<Style> {
        let color = match self {
            TokenType::Tag => &colors.tag,
            TokenType::Attribute => &colors.attribute,
            TokenType::Value => &colors.value,
            TokenType::Punctuation => &colors.punctuation,
            TokenType::Comment => &colors.comment,
            TokenType::Plain => return None,
        };
        Some(Style::default().fg(color.to_color()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub token_type: TokenType,
}

impl Token {
    pub fn new(text: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            text: text.into(),
            token_type,
        }
    }
}

/// Where a line starts. Tags and comments routinely span lines in SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Text,
    InTag,
    /// Inside an unterminated quoted value.
    InValue(char),
    InComment,
}

pub struct Highlighter;

impl Highlighter {
    /// Split one line into tokens, returning the state the next line starts in.
    pub fn tokenize_line(line: &str, state: LexState) -> (Vec<Token>, LexState) {
        let chars: Vec<char> = line.chars().collect();
        let mut tokens = Vec::new();
        let mut state = state;
        let mut pos = 0;

        let take = |from: usize, to: usize| -> String { chars[from..to].iter().collect() };
        let starts_with = |at: usize, pat: &str| -> bool {
            pat.chars()
                .enumerate()
                .all(|(i, p)| chars.get(at + i) == Some(&p))
        };

        while pos < chars.len() {
            match state {
                LexState::InComment => {
                    let start = pos;
                    while pos < chars.len() && !starts_with(pos, "-->") {
                        pos += 1;
                    }
                    if pos < chars.len() {
                        pos += 3;
                        state = LexState::Text;
                    }
                    tokens.push(Token::new(take(start, pos), TokenType::Comment));
                }
                LexState::InValue(quote) => {
                    let start = pos;
                    while pos < chars.len() && chars[pos] != quote {
                        pos += 1;
                    }
                    if pos < chars.len() {
                        pos += 1;
                        state = LexState::InTag;
                    }
                    tokens.push(Token::new(take(start, pos), TokenType::Value));
                }
                LexState::Text => {
                    if starts_with(pos, "<!--") {
                        state = LexState::InComment;
                        continue;
                    }
                    if chars[pos] == '<' {
                        let start = pos;
                        pos += 1;
                        if chars.get(pos) == Some(&'/') {
                            pos += 1;
                        }
                        tokens.push(Token::new(take(start, pos), TokenType::Punctuation));
                        let name_start = pos;
                        while pos < chars.len() && is_name_char(chars[pos]) {
                            pos += 1;
                        }
                        if pos > name_start {
                            tokens.push(Token::new(take(name_start, pos), TokenType::Tag));
                        }
                        state = LexState::InTag;
                        continue;
                    }
                    let start = pos;
                    while pos < chars.len() && chars[pos] != '<' {
                        pos += 1;
                    }
                    tokens.push(Token::new(take(start, pos), TokenType::Plain));
                }
                LexState::InTag => {
                    let ch = chars[pos];
                    if ch == '"' || ch == '\'' {
                        tokens.push(Token::new(ch.to_string(), TokenType::Value));
                        pos += 1;
                        state = LexState::InValue(ch);
                    } else if starts_with(pos, "/>") {
                        tokens.push(Token::new("/>", TokenType::Punctuation));
                        pos += 2;
                        state = LexState::Text;
                    } else if ch == '>' {
                        tokens.push(Token::new(">", TokenType::Punctuation));
                        pos += 1;
                        state = LexState::Text;
                    } else if ch == '=' {
                        tokens.push(Token::new("=", TokenType::Punctuation));
                        pos += 1;
                    } else if is_name_char(ch) {
                        let start = pos;
                        while pos < chars.len() && is_name_char(chars[pos]) {
                            pos += 1;
                        }
                        tokens.push(Token::new(take(start, pos), TokenType::Attribute));
                    } else {
                        let start = pos;
                        pos += 1;
                        while pos < chars.len() && chars[pos].is_whitespace() {
                            pos += 1;
                        }
                        tokens.push(Token::new(take(start, pos), TokenType::Plain));
                    }
                }
            }
        }

        (tokens, state)
    }

    /// One token type per char of `line`, for overlaying selections and matches.
    pub fn classify_chars(line: &str, state: LexState) -> (Vec<TokenType>, LexState) {
        let (tokens, next) = Self::tokenize_line(line, state);
        let classes = tokens
            .iter()
            .flat_map(|t| std::iter::repeat(t.token_type).take(t.text.chars().count()))
            .collect();
        (classes, next)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}
