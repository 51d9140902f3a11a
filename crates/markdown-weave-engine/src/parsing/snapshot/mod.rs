//! # Snapshot Testing Support
//!
//! Utilities for testing the parser via snapshot assertions and invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a parsed [`Document`](crate::model::Document) to a
//!   stable, serializable [`Snap`] for `insta` snapshot testing
//! - **`invariants`**: Structural checks every parse must satisfy (table
//!   parity, no foldable siblings left unmerged, footnote bodies kept out of
//!   the tree, sections only at the root)
//!
//! Parsing behaviour is pinned by snapshot tests rather than a separate
//! formal grammar. A snapshot records the element outline plus the side
//! tables, so reference and footnote definitions show up even though they
//! never appear in the body.

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
