use serde::{Deserialize, Serialize};

/// Visual style carried by a [`Node::Style`](crate::Node::Style) node.
///
/// Serialized in lowercase (`"bold"`, `"superscript"`, ...) as part of the
/// persisted node tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strike,
    Superscript,
    Subscript,
    Spoiler,
    Code,
    /// Text colour; the node's value holds the `#rgb`-style colour.
    Color,
    /// Font size; the node's value holds the size as a decimal string.
    Size,
    /// Greentext quote line.
    Quote,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Bold => "bold",
            Style::Italic => "italic",
            Style::Underline => "underline",
            Style::Strike => "strike",
            Style::Superscript => "superscript",
            Style::Subscript => "subscript",
            Style::Spoiler => "spoiler",
            Style::Code => "code",
            Style::Color => "color",
            Style::Size => "size",
            Style::Quote => "quote",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_name() {
        for style in [Style::Bold, Style::Superscript, Style::Color, Style::Quote] {
            let wire = serde_json::to_value(style).unwrap();
            assert_eq!(wire, serde_json::Value::String(style.to_string()));
        }
    }
}
