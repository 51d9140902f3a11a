//! # Block Parsing
//!
//! Recursive block parser over the segments produced by
//! [`segment`](crate::parsing::segment).
//!
//! ## Modules
//!
//! - **`kinds`**: block-specific types that own their delimiters and row tests
//!   (`CodeFence`, `BlockQuote`, `ListMarker`, `TableSyntax`, ...)
//! - **`parser`**: [`BlockParser`], which tries each construct in a fixed
//!   priority order and recurses into container content
//!
//! ## Key Invariants
//!
//! - Every input block is consumed exactly once; constructs that absorb
//!   following blocks report the next unconsumed index
//! - Container content (quotes, list items, footnotes) is re-segmented and
//!   parsed with the same dispatcher, so nesting depth is unbounded
//! - Fenced code bodies are raw: no block or inline parsing inside
//! - Adjacent lists of the same kind, quotes of the same kind and definition
//!   lists are folded into one element

pub mod kinds;
pub mod parser;

pub use kinds::{ItemKind, ListMarker};
pub use parser::BlockParser;
