//! # markdown-weave engine
//!
//! Parses an extended Markdown dialect into an owned element tree,
//! regenerates Markdown or plain text from it, and computes structural
//! diffs between two parsed documents.
//!
//! - **`parsing`**: segmenter, block parser and inline parser
//! - **`generate`**: the [`generate::Visitor`] traversal and built-in writers
//! - **`diff`**: character-level structural diff
//! - **`capabilities`**: host-supplied emoji lookup and expression evaluation

pub mod capabilities;
pub mod diff;
pub mod error;
pub mod generate;
pub mod model;
pub mod options;
pub mod parsing;

// Re-export key types for easier usage
pub use capabilities::{EmojiLookup, EvalContext, EvalError, ExpressionEvaluator, TransparentErrors};
pub use diff::diff;
pub use error::{EngineError, Result};
pub use generate::{Visitor, to_markdown, to_plain_text, walk};
pub use model::*;
pub use options::{ParseContext, ParseOptions};
pub use parsing::{Parser, parse_document, parse_inline};
