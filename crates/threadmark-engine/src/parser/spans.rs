use log::error;

use crate::{
    Style,
    kinds::{BbTag, WakabaMark},
    token::{Token, TokenKind},
};

/// A resolved style interval over the token stream.
///
/// `start` and `end` are the indices of the opening and closing marker
/// tokens; a token is covered when `start <= token.index <= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    pub start: usize,
    pub end: usize,
    pub style: Style,
    pub value: Option<String>,
}

impl StyleSpan {
    pub fn covers(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    /// True when `self` starts before `other` and ends strictly inside it.
    fn straddles(&self, other: &StyleSpan) -> bool {
        self.start < other.start && self.end > other.start && self.end < other.end
    }
}

/// Key identifying which marker closes an open span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenKey {
    BbCode(BbTag),
    Wakabamark(WakabaMark),
}

impl OpenKey {
    fn style(self) -> Style {
        match self {
            OpenKey::BbCode(tag) => tag.style(),
            OpenKey::Wakabamark(mark) => mark.style(),
        }
    }
}

#[derive(Debug)]
struct OpenSpan {
    key: OpenKey,
    start: usize,
    value: Option<String>,
}

/// Matches start and end markers into style spans, splits partially
/// overlapping spans and sorts the result by start, then by end.
pub fn build_spans(tokens: &[Token]) -> Vec<StyleSpan> {
    let mut open: Vec<OpenSpan> = vec![];
    let mut spans = vec![];

    for token in tokens {
        let key = match &token.kind {
            TokenKind::BbCodeStart { tag, value } => {
                open.push(OpenSpan {
                    key: OpenKey::BbCode(*tag),
                    start: token.index,
                    value: value.clone(),
                });
                continue;
            }
            TokenKind::WakabamarkStart { mark } => {
                open.push(OpenSpan {
                    key: OpenKey::Wakabamark(*mark),
                    start: token.index,
                    value: None,
                });
                continue;
            }
            TokenKind::BbCodeEnd { tag } => OpenKey::BbCode(*tag),
            TokenKind::WakabamarkEnd { mark } => OpenKey::Wakabamark(*mark),
            _ => continue,
        };

        // The tokenizer rewrites unpaired end markers as text.
        let pos = open.iter().rposition(|span| span.key == key);
        debug_assert!(pos.is_some(), "end marker {token:?} has no open span");
        let Some(pos) = pos else {
            error!("end marker {:?} at {} has no open span", key, token.index);
            continue;
        };

        let span = open.remove(pos);
        spans.push(StyleSpan {
            start: span.start,
            end: token.index,
            style: key.style(),
            value: span.value,
        });
    }

    let mut spans = fix_overlaps(spans);
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
    spans
}

/// Splits every span that starts before another and ends inside it into
/// `[first.start, second.start]` and `[second.start, first.end]`, so spans
/// are disjoint or nested afterwards.
///
/// Both pieces include `second.start`, but that index belongs to the second
/// span's start marker and no leaf is built for a marker, so no text node is
/// covered by both pieces.
///
/// Split-off pieces are appended and themselves checked against later
/// spans. Only the forward case is handled: spans are collected in order of
/// their closing marker, so a straddling span normally precedes the span it
/// straddles.
fn fix_overlaps(mut spans: Vec<StyleSpan>) -> Vec<StyleSpan> {
    let mut i = 0;
    while i + 1 < spans.len() {
        let mut j = i + 1;
        while j < spans.len() {
            if spans[i].straddles(&spans[j]) {
                let split_at = spans[j].start;
                let tail = StyleSpan {
                    start: split_at,
                    ..spans[i].clone()
                };
                spans[i].end = split_at;
                spans.push(tail);
            }
            j += 1;
        }
        i += 1;
    }
    spans
}
