//! # Parsing
//!
//! Text to [`Document`] in three layers:
//!
//! - **`segment`**: blank-line and indentation delimited [`Block`]s
//! - **`blocks`**: the recursive [`BlockParser`]
//! - **`inline`**: the backtracking character state machine
//!
//! [`Parser`] ties them together and performs the document-level steps:
//! section wrapping and footnote table completion.

pub mod blocks;
pub mod inline;
pub mod segment;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use blocks::BlockParser;
pub use segment::{Block, segment, segment_rows};

use crate::error::Result;
use crate::model::{Document, Element, Metadata};
use crate::options::ParseContext;

/// Entry point for parsing whole documents.
pub struct Parser<'a> {
    ctx: &'a ParseContext<'a>,
    metadata: Metadata,
}

impl<'a> Parser<'a> {
    pub fn new(ctx: &'a ParseContext<'a>) -> Self {
        Self {
            ctx,
            metadata: Metadata::default(),
        }
    }

    /// Metadata the host extracted from the page (front matter, headers).
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Document> {
        let blocks = segment(text);
        log::debug!("parsing {} bytes in {} block(s)", text.len(), blocks.len());

        let mut parser = BlockParser::new(self.ctx, &self.metadata);
        let elements = parser.parse_blocks(&blocks, 0, blocks.len())?;
        let (references, mut footnotes) = parser.into_tables();

        let missing: Vec<String> = footnotes
            .order()
            .iter()
            .filter(|key| footnotes.get(key).is_none())
            .cloned()
            .collect();
        for key in missing {
            log::debug!("footnote [^{key}] referenced but never defined");
            footnotes.define(&key, Vec::new());
        }

        Ok(Document {
            elements: wrap_sections(elements),
            references,
            footnotes,
            metadata: self.metadata.clone(),
            tag: None,
        })
    }
}

/// Parses `text` with default options and no capabilities.
pub fn parse_document(text: &str) -> Result<Document> {
    let ctx = ParseContext::default();
    Parser::new(&ctx).parse(text)
}

/// Parses a single run of inline text, discarding any side-table entries.
pub fn parse_inline(text: &str, ctx: &ParseContext<'_>) -> Result<Vec<Element>> {
    let (rows, offsets) = segment::split_rows(text);
    let positions: Vec<usize> = rows
        .iter()
        .zip(&offsets)
        .map(|(row, &offset)| offset + segment::leading_indent(row).1)
        .collect();
    let metadata = Metadata::default();
    let mut parser = BlockParser::new(ctx, &metadata);
    let (elements, _) = parser.parse_inline(&rows, &positions, 0, rows.len(), None, 0)?;
    Ok(elements)
}

/// Wraps the body in a [`Element::Section`] when a top-level section
/// separator is present. The first separator becomes the section's header.
fn wrap_sections(mut elements: Vec<Element>) -> Vec<Element> {
    let Some(first) = elements
        .iter()
        .position(|e| matches!(e, Element::SectionBreak { .. }))
    else {
        return elements;
    };
    let Element::SectionBreak { columns, separator } = elements.remove(first) else {
        return elements;
    };
    log::debug!("document is sectioned into {columns} column(s)");
    vec![Element::Section {
        columns,
        separator,
        children: elements,
    }]
}
