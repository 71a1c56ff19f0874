//! # threadmark-engine
//!
//! Markup engine for forum posts. Raw message text goes through three
//! stages:
//!
//! 1. [`tokenize`]: raw text to a flat [`Token`] stream, with unpaired tags
//!    degraded to text
//! 2. [`parse`]: tokens to a normalized [`Node`] tree, with BBCode and
//!    Wakabamark spans resolved and crossing spans split
//! 3. [`PostProcessor`]: resolves `>>123` references and link embeds through
//!    [`Lookups`] and rolls dice
//!
//! The resulting `Vec<Node>` serializes to the persisted JSON document.

pub mod error;
pub mod kinds;
pub mod node;
pub mod parser;
pub mod process;
pub mod style;
pub mod token;
pub mod tokenizer;

// Re-export key types for easier usage
pub use error::ProcessError;
pub use node::Node;
pub use parser::{parse, parse_message};
pub use process::{EmbedInfo, Lookups, NoLookups, PostProcessor, PostRef, post_process};
pub use style::Style;
pub use token::{Token, TokenKind};
pub use tokenizer::tokenize;
