//! # Block Kinds
//!
//! Block-specific types that own their syntax. The dispatcher in
//! [`parser`](super::parser) asks them whether a row opens their construct.

pub mod block_quote;
pub mod code_fence;
pub mod comment;
pub mod definition;
pub mod footnote;
pub mod header;
pub mod list;
pub mod rule;
pub mod table;

pub use block_quote::{BlockQuote, QuoteMarker};
pub use code_fence::{CodeFence, FenceOpen};
pub use comment::Comment;
pub use definition::Definition;
pub use footnote::FootnoteDefinition;
pub use header::{AtxHeader, SetextHeader};
pub use list::{ItemKind, ListMarker};
pub use rule::{Rule, RuleKind};
pub use table::{RawCell, TableSyntax};
