//! # Inline Kinds
//!
//! Inline-specific types that own their syntax delimiters and the pure
//! helpers that recognise them. The parser asks these types; it never
//! hardcodes a delimiter itself.
//!
//! ## Types
//!
//! - **`CodeSpan`**: `` ` `` and ``` `` ``` raw zones
//! - **`Emphasis`**: `*`, `_`, `~`, `^`, `,,` paired spans
//! - **`Entity`**: `&name;` references and arrow shorthands
//! - **`Emoji`**: `:name:` shorthands and emoticons
//! - **`HtmlTag`**: raw tags, block tags, verbatim tags, automatic links
//! - **`Link`**: link/image targets and footnote markers
//! - **`Script`**: `{{ ... }}` expression placeholders
//! - **`BareUrl`**: `http(s)://` runs in plain text

pub mod bare_url;
pub mod code_span;
pub mod emoji;
pub mod emphasis;
pub mod entity;
pub mod html_tag;
pub mod link;
pub mod script;

pub use bare_url::BareUrl;
pub use code_span::CodeSpan;
pub use emoji::Emoji;
pub use emphasis::Emphasis;
pub use entity::Entity;
pub use html_tag::{HtmlTag, Verbatim};
pub use link::Link;
pub use script::Script;
