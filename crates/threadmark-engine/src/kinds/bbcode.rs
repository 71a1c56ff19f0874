use serde::{Deserialize, Serialize};

use crate::Style;

/// A BBCode tag name from the fixed whitelist.
///
/// Tag names are matched case-insensitively, so `[B]` and `[/b]` pair up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BbTag {
    B,
    I,
    U,
    S,
    Sup,
    Sub,
    Spoiler,
    Code,
    Color,
    Size,
}

impl BbTag {
    pub const OPEN: char = '[';
    pub const CLOSE: char = ']';
    pub const END_MARKER: char = '/';
    pub const VALUE_SEPARATOR: char = '=';

    /// Looks up a tag by its name as written between the brackets.
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name.to_ascii_lowercase().as_str() {
            "b" => BbTag::B,
            "i" => BbTag::I,
            "u" => BbTag::U,
            "s" => BbTag::S,
            "sup" => BbTag::Sup,
            "sub" => BbTag::Sub,
            "spoiler" => BbTag::Spoiler,
            "code" => BbTag::Code,
            "color" => BbTag::Color,
            "size" => BbTag::Size,
            _ => return None,
        };
        Some(tag)
    }

    pub fn name(self) -> &'static str {
        match self {
            BbTag::B => "b",
            BbTag::I => "i",
            BbTag::U => "u",
            BbTag::S => "s",
            BbTag::Sup => "sup",
            BbTag::Sub => "sub",
            BbTag::Spoiler => "spoiler",
            BbTag::Code => "code",
            BbTag::Color => "color",
            BbTag::Size => "size",
        }
    }

    pub fn style(self) -> Style {
        match self {
            BbTag::B => Style::Bold,
            BbTag::I => Style::Italic,
            BbTag::U => Style::Underline,
            BbTag::S => Style::Strike,
            BbTag::Sup => Style::Superscript,
            BbTag::Sub => Style::Subscript,
            BbTag::Spoiler => Style::Spoiler,
            BbTag::Code => Style::Code,
            BbTag::Color => Style::Color,
            BbTag::Size => Style::Size,
        }
    }

    /// Canonical opening markup, e.g. `[b]` or `[code]`.
    pub fn open_markup(self) -> String {
        format!("{}{}{}", Self::OPEN, self.name(), Self::CLOSE)
    }

    /// Canonical closing markup, e.g. `[/b]`.
    pub fn close_markup(self) -> String {
        format!(
            "{}{}{}{}",
            Self::OPEN,
            Self::END_MARKER,
            self.name(),
            Self::CLOSE
        )
    }
}

impl std::fmt::Display for BbTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
