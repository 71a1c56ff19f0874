use serde::Serialize;

use crate::kinds::{BbTag, WakabaMark};

/// A token produced by [`tokenize`](crate::tokenize).
///
/// `index` is the byte offset of the token in the normalized source text
/// (carriage returns stripped) and `text` is the raw text it was scanned
/// from, so a marker that degrades to text keeps its original spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub index: usize,
    pub text: String,
    #[serde(flatten)]
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TokenKind {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "newline")]
    NewLine,
    /// A line starting with `>`; `quote` is everything after the marker.
    #[serde(rename = "quote")]
    Quote { quote: String },
    #[serde(rename = "reflink")]
    RefLink {
        #[serde(rename = "postID")]
        post_id: u64,
    },
    #[serde(rename = "link")]
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        icon: Option<String>,
    },
    #[serde(rename = "dice")]
    Dice { count: u32, max: u32 },
    #[serde(rename = "bb_start")]
    BbCodeStart {
        tag: BbTag,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    #[serde(rename = "bb_end")]
    BbCodeEnd { tag: BbTag },
    #[serde(rename = "wm_start")]
    WakabamarkStart { mark: WakabaMark },
    #[serde(rename = "wm_end")]
    WakabamarkEnd { mark: WakabaMark },
}

impl Token {
    pub fn new(index: usize, text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            index,
            text: text.into(),
            kind,
        }
    }

    pub fn text(index: usize, text: impl Into<String>) -> Self {
        Self::new(index, text, TokenKind::Text)
    }
}
