//! # Document Model
//!
//! - **`element`**: the closed [`Element`] tree and its capability methods
//! - **`document`**: the [`Document`] aggregate with its references, footnotes
//!   and metadata side tables

pub mod document;
pub mod element;

pub use document::{Document, Footnotes, Metadata, MetadataValue, References};
pub use element::{
    Alignment, DefinitionEntry, Element, LinkTarget, ListItem, ListKind, MediaSource, QuoteKind,
    Table, TableCell, TaskItem,
};
