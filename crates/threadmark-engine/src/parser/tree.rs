use crate::{
    Node, Style,
    parser::spans::StyleSpan,
    token::{Token, TokenKind},
};

/// Builds one leaf per text-bearing token and wraps it in a style node for
/// every span covering it, outermost (first-sorted) span outside.
///
/// `spans` must be sorted as returned by
/// [`build_spans`](crate::parser::spans::build_spans). The result is not
/// normalized.
pub fn build_tree(tokens: &[Token], spans: &[StyleSpan]) -> Vec<Node> {
    tokens
        .iter()
        .filter_map(|token| {
            let leaf = leaf_for(token)?;
            let node = spans
                .iter()
                .filter(|span| span.covers(token.index))
                .rev()
                .fold(leaf, |node, span| node.wrap(span.style, span.value.clone()));
            Some(node)
        })
        .collect()
}

/// Leaf node for a text-bearing token; `None` for markers.
fn leaf_for(token: &Token) -> Option<Node> {
    let node = match &token.kind {
        TokenKind::Text => Node::text(token.text.as_str()),
        TokenKind::NewLine => Node::NewLine,
        TokenKind::Quote { quote } => Node::text(quote.as_str()).wrap(Style::Quote, None),
        TokenKind::RefLink { post_id } => Node::RefLink {
            post_id: *post_id,
            thread_id: None,
            slug: None,
        },
        TokenKind::Link { url, icon } => Node::Link {
            text: token.text.clone(),
            url: url.clone(),
            icon: icon.clone(),
        },
        TokenKind::Dice { count, max } => Node::Dice {
            count: *count,
            max: *max,
            result: None,
        },
        TokenKind::BbCodeStart { .. }
        | TokenKind::BbCodeEnd { .. }
        | TokenKind::WakabamarkStart { .. }
        | TokenKind::WakabamarkEnd { .. } => return None,
    };
    Some(node)
}

/// Merges adjacent style nodes with the same style and value (recursively
/// merging their children) and adjacent text nodes.
///
/// Idempotent: normalizing an already normalized sequence returns it
/// unchanged.
pub fn normalize(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        let node = match node {
            Node::Style {
                style,
                value,
                children,
            } => Node::Style {
                style,
                value,
                children: normalize(children),
            },
            other => other,
        };

        let unmerged = match out.last_mut() {
            Some(last) => merge_into(last, node),
            None => Some(node),
        };
        if let Some(node) = unmerged {
            out.push(node);
        }
    }

    out
}

/// Merges `node` into `last` when they are mergeable, otherwise hands it
/// back. Both must already be normalized.
fn merge_into(last: &mut Node, node: Node) -> Option<Node> {
    match (last, node) {
        (Node::Text { text }, Node::Text { text: next }) => {
            text.push_str(&next);
            None
        }
        (
            Node::Style {
                style,
                value,
                children,
            },
            Node::Style {
                style: next_style,
                value: next_value,
                children: next_children,
            },
        ) if *style == next_style && *value == next_value => {
            // Both child lists are normalized, so only the seam can merge.
            let mut next_children = next_children.into_iter();
            if let Some(first) = next_children.next() {
                let unmerged = match children.last_mut() {
                    Some(last) => merge_into(last, first),
                    None => Some(first),
                };
                children.extend(unmerged);
            }
            children.extend(next_children);
            None
        }
        (_, node) => Some(node),
    }
}
