//! # Parser
//!
//! Turns a token stream into a normalized node tree in three steps:
//!
//! - **`spans`**: matches start/end markers of both dialects into
//!   [`StyleSpan`]s and splits spans that cross instead of nesting
//! - **`tree`**: wraps every text-bearing token in a style node per covering
//!   span, then merges adjacent equal nodes
//!
//! Parsing never fails. Input that does not form valid markup has already
//! been turned into text by the tokenizer.

pub mod spans;
pub mod tree;

use log::debug;

pub use spans::{StyleSpan, build_spans};
pub use tree::{build_tree, normalize};

use crate::{Node, token::Token, tokenizer::tokenize};

/// Parses a token stream produced by [`tokenize`] into a normalized tree.
pub fn parse(tokens: &[Token]) -> Vec<Node> {
    let spans = build_spans(tokens);
    let nodes = normalize(build_tree(tokens, &spans));
    debug!(
        "parsed {} tokens with {} spans into {} nodes",
        tokens.len(),
        spans.len(),
        nodes.len()
    );
    nodes
}

/// Tokenizes and parses a raw message.
pub fn parse_message(text: &str) -> Vec<Node> {
    parse(&tokenize(text))
}
