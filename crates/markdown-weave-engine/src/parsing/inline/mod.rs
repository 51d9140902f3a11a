//! # Inline Parsing
//!
//! A backtracking character state machine that turns a run of rows into
//! inline elements.
//!
//! ## Architecture
//!
//! The parser dispatches on the leading character of each construct.
//! Paired markers open a nested span that scans until its closer; a span
//! that never finds its closer is recovered by re-emitting the opening
//! marker as text followed by whatever was parsed after it.
//!
//! Ambiguous constructs (emoticons, tags, expression placeholders) save a
//! value-type [`Mark`](cursor::Mark) and restore it on mismatch. Restoring
//! also truncates output produced since the mark.
//!
//! ## Modules
//!
//! - **`kinds`**: Inline-specific types with owned delimiters
//! - **`cursor`**: `Cursor` over rows with row-crossing look-ahead and marks
//! - **`parser`**: `InlineParser`, the dispatch loop and its `try`-style helpers
//!
//! ## Capability gates
//!
//! Emoticons and `:name:` shorthands only fire with an emoji lookup
//! configured; `{{ }}` placeholders only with an evaluator.

pub mod cursor;
pub mod kinds;
pub mod parser;

pub use cursor::{Cursor, Mark};
pub use parser::{InlineParser, Terminator};
