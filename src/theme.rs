use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub ui: UiColors,
    pub markup: MarkupColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiColors {
    pub background: ThemeColor,
    pub foreground: ThemeColor,
    pub border: ThemeColor,
    pub border_focused: ThemeColor,
    pub line_numbers: ThemeColor,
    pub cursor_line: ThemeColor,
    pub selection: ThemeColor,
    pub search_match: ThemeColor,
    pub search_match_current: ThemeColor,
    pub search_match_fg: ThemeColor,

    // Status bar
    pub status_bar_bg: ThemeColor,
    pub status_bar_fg: ThemeColor,
    pub mode_edit_bg: ThemeColor,
    pub mode_find_bg: ThemeColor,
    pub mode_fg: ThemeColor,
    pub modified: ThemeColor,

    // Completion popup
    pub popup_bg: ThemeColor,
    pub popup_selected: ThemeColor,
    pub popup_detail: ThemeColor,
}

/// Colors for SVG source and for completion kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupColors {
    pub tag: ThemeColor,        // <rect, </g>
    pub attribute: ThemeColor,  // fill=
    pub value: ThemeColor,      // "quoted values"
    pub punctuation: ThemeColor,
    pub comment: ThemeColor,    // <!-- -->
    pub element_kind: ThemeColor,
    pub attribute_kind: ThemeColor,
    pub color_kind: ThemeColor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeColor {
    Rgb { r: u8, g: u8, b: u8 },
    Named(String),
}

impl ThemeColor {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgb { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        match self {
            ThemeColor::Rgb { r, g, b } => Color::Rgb(*r, *g, *b),
            ThemeColor::Named(name) => named_color(name).unwrap_or(Color::White),
        }
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        hex => {
            let digits = hex
                .strip_prefix('#')
                .filter(|d| d.len() == 6 && d.is_ascii())?;
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Color::Rgb(channel(0)?, channel(2)?, channel(4)?)
        }
    };
    Some(color)
}

/// The handful of tones a theme is derived from.
struct Palette {
    bg: (u8, u8, u8),
    bg_alt: (u8, u8, u8),
    bg_high: (u8, u8, u8),
    fg: (u8, u8, u8),
    muted: (u8, u8, u8),
    red: (u8, u8, u8),
    green: (u8, u8, u8),
    yellow: (u8, u8, u8),
    blue: (u8, u8, u8),
    purple: (u8, u8, u8),
    orange: (u8, u8, u8),
}

fn c((r, g, b): (u8, u8, u8)) -> ThemeColor {
    ThemeColor::rgb(r, g, b)
}

impl Theme {
    fn from_palette(name: &str, p: Palette) -> Self {
        Self {
            name: name.to_string(),
            ui: UiColors {
                background: c(p.bg),
                foreground: c(p.fg),
                border: c(p.bg_high),
                border_focused: c(p.blue),
                line_numbers: c(p.muted),
                cursor_line: c(p.bg_alt),
                selection: c(p.bg_high),
                search_match: c(p.yellow),
                search_match_current: c(p.orange),
                search_match_fg: c(p.bg),
                status_bar_bg: c(p.bg_alt),
                status_bar_fg: c(p.fg),
                mode_edit_bg: c(p.green),
                mode_find_bg: c(p.orange),
                mode_fg: c(p.bg),
                modified: c(p.yellow),
                popup_bg: c(p.bg_alt),
                popup_selected: c(p.bg_high),
                popup_detail: c(p.muted),
            },
            markup: MarkupColors {
                tag: c(p.red),
                attribute: c(p.yellow),
                value: c(p.green),
                punctuation: c(p.muted),
                comment: c(p.muted),
                element_kind: c(p.red),
                attribute_kind: c(p.blue),
                color_kind: c(p.purple),
            },
        }
    }

    pub fn dark() -> Self {
        Self::from_palette(
            "dark",
            Palette {
                bg: (30, 30, 30),
                bg_alt: (40, 40, 40),
                bg_high: (60, 60, 60),
                fg: (212, 212, 212),
                muted: (110, 110, 110),
                red: (86, 156, 214),
                green: (206, 145, 120),
                yellow: (156, 220, 254),
                blue: (100, 149, 237),
                purple: (197, 134, 192),
                orange: (220, 160, 80),
            },
        )
    }

    pub fn gruvbox() -> Self {
        Self::from_palette(
            "gruvbox",
            Palette {
                bg: (40, 40, 40),
                bg_alt: (50, 48, 47),
                bg_high: (80, 73, 69),
                fg: (235, 219, 178),
                muted: (146, 131, 116),
                red: (251, 73, 52),
                green: (184, 187, 38),
                yellow: (250, 189, 47),
                blue: (131, 165, 152),
                purple: (211, 134, 155),
                orange: (254, 128, 25),
            },
        )
    }

    pub fn nord() -> Self {
        Self::from_palette(
            "nord",
            Palette {
                bg: (46, 52, 64),
                bg_alt: (59, 66, 82),
                bg_high: (67, 76, 94),
                fg: (236, 239, 244),
                muted: (76, 86, 106),
                red: (129, 161, 193),
                green: (163, 190, 140),
                yellow: (235, 203, 139),
                blue: (136, 192, 208),
                purple: (180, 142, 173),
                orange: (208, 135, 112),
            },
        )
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::dark(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox()
    }
}
