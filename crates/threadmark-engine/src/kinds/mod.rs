//! # Markup Kinds
//!
//! Types that own the syntax of each markup dialect: delimiters, accepted
//! names and the mapping to [`Style`](crate::Style). The parser works on
//! these types only and never looks at raw markup text.
//!
//! ## Types
//!
//! - **`BbTag`**: bracket tags (`[b]`, `[color=#f00]`, `[/size]`, ...)
//! - **`WakabaMark`**: toggle symbols (`**`, `*`, `%%`, `~~`)
//! - **`Dice`**: `##NdM##` roll expressions
//!
//! Both dialect-to-style mappings are exhaustive matches, so adding a tag
//! without a style is a compile error rather than a runtime failure.

pub mod bbcode;
pub mod dice;
pub mod wakabamark;

pub use bbcode::BbTag;
pub use dice::Dice;
pub use wakabamark::WakabaMark;
