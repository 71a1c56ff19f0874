use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};

use crate::{
    kinds::{BbTag, Dice, WakabaMark},
    token::{Token, TokenKind},
};

/// Scheme, optional basic auth, host or bracketed IPv6 literal, path,
/// query and fragment. Brackets and whitespace always end a URL.
const URL_PATTERN: &str = concat!(
    r"https?://",
    r"(?:[^?#@\[\]\s]+@)?",
    r"(?:[^.\[\]\s-][^?#/\[\]\s]*|\[[0-9a-f:]+\](?::[0-9]+)?)",
    r"(?:/[^/?#\[\]\s]*)*",
    r"(?:\?[^#\[\]\s]+)?",
    r"(?:#[^\[\]\s]+)?",
);

/// Alternatives in priority order. Leftmost-first matching means an earlier
/// alternative wins whenever two could start at the same position.
fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        let open = regex::escape(&BbTag::OPEN.to_string());
        let close = regex::escape(&BbTag::CLOSE.to_string());
        let end = regex::escape(&BbTag::END_MARKER.to_string());
        let eq = regex::escape(&BbTag::VALUE_SEPARATOR.to_string());
        let pattern = [
            // Code block is a raw zone, captured whole
            format!(
                "{}(?P<code_body>(?s:.*?)){}",
                regex::escape(&BbTag::Code.open_markup()),
                regex::escape(&BbTag::Code.close_markup()),
            ),
            format!("{open}(?P<bb_open>[bius]|su[pb]|spoiler){close}"),
            format!(
                "{open}{color}{eq}(?P<color>#(?:[0-9a-f]{{3,4}}|[0-9a-f]{{6}}|[0-9a-f]{{8}})){close}",
                color = BbTag::Color.name(),
            ),
            format!(
                "{open}{size}{eq}(?P<size>[1-9][0-9]?){close}",
                size = BbTag::Size.name(),
            ),
            format!("{open}{end}(?P<bb_close>[bius]|su[pb]|spoiler|color|size){close}"),
            r">>(?P<reflink>[0-9]+)".to_string(),
            r"(?P<quote>^>(?P<quote_body>.*?)$)".to_string(),
            r"(?P<wakabamark>\*\*|\*|%%|~~)".to_string(),
            r"(?P<newline>\n)".to_string(),
            format!("(?P<link>{URL_PATTERN})"),
            format!(
                "{fence}(?P<dice_count>[0-9]{{1,2}}){sep}(?P<dice_max>[0-9]{{1,4}}){fence}",
                fence = Dice::FENCE,
                sep = Dice::SEPARATOR,
            ),
        ]
        .join("|");
        Regex::new(&format!("(?im){pattern}")).expect("Invalid token regex")
    })
}

/// Scans raw message text into a flat token stream.
///
/// Total: anything that is not well-formed markup ends up in a
/// [`TokenKind::Text`] token. Unpaired tags are rewritten to text and
/// adjacent text tokens are merged, so the result never contains a marker
/// without its partner.
pub fn tokenize(text: &str) -> Vec<Token> {
    let text = text.replace('\r', "");
    let mut scanner = Scanner::default();
    let mut last = 0;

    for caps in token_regex().captures_iter(&text) {
        let Some(m) = caps.get(0) else { continue };
        if m.start() > last {
            scanner.push(Token::text(last, &text[last..m.start()]));
        }
        scanner.classify(&caps, &text);
        last = m.end();
    }
    if last < text.len() {
        scanner.push(Token::text(last, &text[last..]));
    }

    let tokens = merge_text_tokens(convert_unpaired_tags_to_text(scanner.tokens));
    debug!("tokenized {} bytes into {} tokens", text.len(), tokens.len());
    tokens
}

#[derive(Default)]
struct Scanner {
    tokens: Vec<Token>,
    /// Wakabamark symbols currently toggled on.
    open_marks: Vec<WakabaMark>,
}

impl Scanner {
    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn classify(&mut self, caps: &Captures<'_>, source: &str) {
        let Some(m) = caps.get(0) else { return };
        let (index, raw) = (m.start(), m.as_str());

        if let Some(body) = caps.name("code_body") {
            self.push(Token::new(
                index,
                &source[index..body.start()],
                TokenKind::BbCodeStart {
                    tag: BbTag::Code,
                    value: None,
                },
            ));
            self.push(Token::text(body.start(), body.as_str()));
            self.push(Token::new(
                body.end(),
                &source[body.end()..m.end()],
                TokenKind::BbCodeEnd { tag: BbTag::Code },
            ));
            return;
        }

        let kind = self.kind_of(caps);
        self.push(Token::new(index, raw, kind.unwrap_or(TokenKind::Text)));
    }

    /// Maps a match to its token kind; `None` means the match is only text
    /// (a reflink id that overflows, a dice expression that cannot roll).
    fn kind_of(&mut self, caps: &Captures<'_>) -> Option<TokenKind> {
        if let Some(name) = caps.name("bb_open") {
            let tag = BbTag::from_name(name.as_str())?;
            return Some(TokenKind::BbCodeStart { tag, value: None });
        }
        if let Some(color) = caps.name("color") {
            return Some(TokenKind::BbCodeStart {
                tag: BbTag::Color,
                value: Some(color.as_str().to_string()),
            });
        }
        if let Some(size) = caps.name("size") {
            return Some(TokenKind::BbCodeStart {
                tag: BbTag::Size,
                value: Some(size.as_str().to_string()),
            });
        }
        if let Some(name) = caps.name("bb_close") {
            let tag = BbTag::from_name(name.as_str())?;
            return Some(TokenKind::BbCodeEnd { tag });
        }
        if let Some(id) = caps.name("reflink") {
            let post_id = id.as_str().parse().ok()?;
            return Some(TokenKind::RefLink { post_id });
        }
        if let Some(body) = caps.name("quote_body") {
            return Some(TokenKind::Quote {
                quote: body.as_str().to_string(),
            });
        }
        if let Some(symbol) = caps.name("wakabamark") {
            let mark = WakabaMark::from_symbol(symbol.as_str())?;
            return Some(self.toggle(mark));
        }
        if caps.name("newline").is_some() {
            return Some(TokenKind::NewLine);
        }
        if let Some(url) = caps.name("link") {
            return Some(TokenKind::Link {
                url: url.as_str().to_string(),
                icon: None,
            });
        }
        if let (Some(count), Some(max)) = (caps.name("dice_count"), caps.name("dice_max")) {
            let dice = Dice::new(count.as_str().parse().ok()?, max.as_str().parse().ok()?)?;
            return Some(TokenKind::Dice {
                count: dice.count,
                max: dice.max,
            });
        }
        None
    }

    /// Opens the symbol if it is not already open, otherwise closes it.
    fn toggle(&mut self, mark: WakabaMark) -> TokenKind {
        match self.open_marks.iter().position(|open| *open == mark) {
            Some(pos) => {
                self.open_marks.remove(pos);
                TokenKind::WakabamarkEnd { mark }
            }
            None => {
                self.open_marks.push(mark);
                TokenKind::WakabamarkStart { mark }
            }
        }
    }
}

/// Deepest style nesting kept as markup. Markers opening past it are text.
pub const MAX_NESTING: usize = 32;

/// Rewrites every end marker without an open partner, and every start
/// marker still open at end of input, as text. Pairs that would open past
/// [`MAX_NESTING`] are rewritten as text too, so the node tree built from
/// the tokens is at most that deep (plus one for a quote).
fn convert_unpaired_tags_to_text(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut open_tags: Vec<(usize, BbTag)> = vec![];
    let mut open_marks: Vec<(usize, WakabaMark)> = vec![];
    let mut partners: Vec<Option<usize>> = vec![None; tokens.len()];
    let mut unpaired: Vec<usize> = vec![];

    for (pos, token) in tokens.iter().enumerate() {
        let opened = match &token.kind {
            TokenKind::BbCodeStart { tag, .. } => {
                open_tags.push((pos, *tag));
                continue;
            }
            TokenKind::WakabamarkStart { mark } => {
                open_marks.push((pos, *mark));
                continue;
            }
            TokenKind::BbCodeEnd { tag } => open_tags
                .iter()
                .rposition(|(_, open)| open == tag)
                .map(|i| open_tags.remove(i).0),
            TokenKind::WakabamarkEnd { mark } => open_marks
                .iter()
                .rposition(|(_, open)| open == mark)
                .map(|i| open_marks.remove(i).0),
            _ => continue,
        };
        match opened {
            Some(start) => {
                partners[start] = Some(pos);
                partners[pos] = Some(start);
            }
            None => unpaired.push(pos),
        }
    }

    unpaired.extend(open_tags.into_iter().map(|(pos, _)| pos));
    unpaired.extend(open_marks.into_iter().map(|(pos, _)| pos));
    unpaired.extend(too_deep(&partners));
    for pos in unpaired {
        tokens[pos].kind = TokenKind::Text;
    }
    tokens
}

/// Positions of both markers of every pair that opens while
/// [`MAX_NESTING`] pairs are already open.
///
/// Dropping a whole pair leaves every other pair matched the same way, so
/// the span resolver still finds a partner for each remaining end marker.
fn too_deep(partners: &[Option<usize>]) -> Vec<usize> {
    let mut depth = 0usize;
    let mut flattened = vec![false; partners.len()];
    let mut positions = vec![];

    for (pos, partner) in partners.iter().enumerate() {
        let Some(partner) = *partner else { continue };
        if partner > pos {
            if depth >= MAX_NESTING {
                flattened[partner] = true;
                positions.extend([pos, partner]);
            } else {
                depth += 1;
            }
        } else if !flattened[pos] {
            depth -= 1;
        }
    }

    if !positions.is_empty() {
        debug!(
            "flattened {} markers nested deeper than {MAX_NESTING}",
            positions.len()
        );
    }
    positions
}

/// Joins runs of adjacent text tokens, keeping the first token's index.
fn merge_text_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut merged: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(last) = merged.last_mut()
            && last.kind == TokenKind::Text
            && token.kind == TokenKind::Text
        {
            last.text.push_str(&token.text);
            continue;
        }
        merged.push(token);
    }
    merged
}
