use serde::{Deserialize, Serialize};

use crate::Style;

/// A Wakabamark toggle symbol.
///
/// The same symbol both opens and closes a span, so two markers of the same
/// kind can never nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WakabaMark {
    #[serde(rename = "**")]
    DoubleStar,
    #[serde(rename = "*")]
    Star,
    #[serde(rename = "%%")]
    DoublePercent,
    #[serde(rename = "~~")]
    DoubleTilde,
}

impl WakabaMark {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mark = match symbol {
            "**" => WakabaMark::DoubleStar,
            "*" => WakabaMark::Star,
            "%%" => WakabaMark::DoublePercent,
            "~~" => WakabaMark::DoubleTilde,
            _ => return None,
        };
        Some(mark)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            WakabaMark::DoubleStar => "**",
            WakabaMark::Star => "*",
            WakabaMark::DoublePercent => "%%",
            WakabaMark::DoubleTilde => "~~",
        }
    }

    pub fn style(self) -> Style {
        match self {
            WakabaMark::DoubleStar => Style::Bold,
            WakabaMark::Star => Style::Italic,
            WakabaMark::DoubleTilde => Style::Strike,
            WakabaMark::DoublePercent => Style::Spoiler,
        }
    }
}

impl std::fmt::Display for WakabaMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
