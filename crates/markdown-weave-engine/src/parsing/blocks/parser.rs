use crate::error::Result;
use crate::model::element::push_merged;
use crate::model::{
    DefinitionEntry, Element, Footnotes, ListItem, Metadata, References, Table, TableCell, TaskItem,
};
use crate::options::ParseContext;
use crate::parsing::inline::InlineParser;
use crate::parsing::segment::{Block, TAB_WIDTH, is_header_row, leading_indent, segment_rows, strip_columns};

use super::kinds::{
    AtxHeader, BlockQuote, CodeFence, Comment, Definition, FootnoteDefinition, ItemKind, ListMarker,
    Rule, RuleKind, SetextHeader, TableSyntax,
};

/// Recursive block-level parser.
///
/// Owns the side tables (references, footnotes) filled while parsing and
/// borrows everything else from the host through [`ParseContext`].
pub struct BlockParser<'a> {
    ctx: &'a ParseContext<'a>,
    metadata: &'a Metadata,
    pub(crate) references: References,
    pub(crate) footnotes: Footnotes,
}

/// A list item after its marker has been stripped.
struct RawItem {
    marker: ListMarker,
    rows: Vec<String>,
    positions: Vec<usize>,
}

impl<'a> BlockParser<'a> {
    pub fn new(ctx: &'a ParseContext<'a>, metadata: &'a Metadata) -> Self {
        Self {
            ctx,
            metadata,
            references: References::default(),
            footnotes: Footnotes::default(),
        }
    }

    pub fn context(&self) -> &'a ParseContext<'a> {
        self.ctx
    }

    pub fn metadata(&self) -> &'a Metadata {
        self.metadata
    }

    /// Hands over the side tables collected during the parse.
    pub fn into_tables(self) -> (References, Footnotes) {
        (self.references, self.footnotes)
    }

    /// Parses `blocks[start..end]` into block elements.
    pub fn parse_blocks(&mut self, blocks: &[Block], start: usize, end: usize) -> Result<Vec<Element>> {
        let end = end.min(blocks.len());
        let mut out = Vec::new();
        let mut i = start;
        while i < end {
            i = self.parse_block(blocks, i, end, &mut out)?;
        }
        Ok(out)
    }

    /// Parses rows as inline content. See [`InlineParser::parse`].
    pub fn parse_inline(
        &mut self,
        rows: &[String],
        positions: &[usize],
        start_row: usize,
        end_row: usize,
        terminator: Option<char>,
        run_length: usize,
    ) -> Result<(Vec<Element>, bool)> {
        InlineParser::new(self, rows, positions, start_row, end_row).parse(terminator, run_length)
    }

    fn inline(&mut self, rows: &[String], positions: &[usize]) -> Result<Vec<Element>> {
        Ok(self.parse_inline(rows, positions, 0, rows.len(), None, 0)?.0)
    }

    /// Tries each block construct in priority order; returns the index of the
    /// next unconsumed block.
    fn parse_block(&mut self, blocks: &[Block], i: usize, end: usize, out: &mut Vec<Element>) -> Result<usize> {
        let block = &blocks[i];
        if block.indent_level() > 0 {
            return Ok(self.indented_code(blocks, i, end, out));
        }
        if let Some(next) = self.fenced_code(blocks, i, end, out)? {
            return Ok(next);
        }
        if self.quote(block, out)? {
            return Ok(i + 1);
        }
        if Comment::is_comment(block.first()) {
            log::debug!("block {i}: comment");
            out.push(Element::CommentBlock(Comment::body(block.rows())));
            return Ok(i + 1);
        }
        if self.rule(block, out) {
            return Ok(i + 1);
        }
        if let Some(next) = self.list(blocks, i, end, out)? {
            return Ok(next);
        }
        if self.table(block, out)? {
            return Ok(i + 1);
        }
        if let Some(next) = self.definition(blocks, i, end, out)? {
            return Ok(next);
        }
        if let Some(next) = self.footnote_definition(blocks, i, end)? {
            return Ok(next);
        }
        if self.setext(block, out)? || self.atx(block, out)? {
            return Ok(i + 1);
        }
        self.paragraph(block, out)?;
        Ok(i + 1)
    }

    fn indented_code(&mut self, blocks: &[Block], i: usize, end: usize, out: &mut Vec<Element>) -> usize {
        let run_end = (i..end)
            .find(|&j| blocks[j].indent_level() == 0)
            .unwrap_or(end);
        let run = &blocks[i..run_end];
        let min = run.iter().map(Block::indent_level).min().unwrap_or(1);
        let text = run
            .iter()
            .map(|b| {
                let pad = " ".repeat(TAB_WIDTH * (b.indent_level() - min));
                b.rows()
                    .iter()
                    .map(|r| format!("{pad}{r}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        log::debug!("blocks {i}..{run_end}: indented code");
        out.push(Element::CodeBlock { language: None, text });
        run_end
    }

    fn fenced_code(&mut self, blocks: &[Block], i: usize, end: usize, out: &mut Vec<Element>) -> Result<Option<usize>> {
        let block = &blocks[i];
        let Some(open) = CodeFence::open(block.first()) else {
            return Ok(None);
        };

        if let Some(k) = (1..block.len()).find(|&k| CodeFence::closes(block.row(k), open.run)) {
            let body = block.rows()[1..k].join("\n");
            out.push(Self::code_block(open.language, body));
            if let Some(rest) = block.slice(k + 1, block.len()) {
                let (rows, positions) = rest.to_owned_rows();
                let segments = resegment(&rows, &positions);
                for element in self.parse_blocks(&segments, 0, segments.len())? {
                    push_merged(out, element);
                }
            }
            return Ok(Some(i + 1));
        }

        let Some(j) = (i + 1..end).find(|&j| CodeFence::closes(blocks[j].last(), open.run)) else {
            log::debug!("block {i}: fence never closed, falling through");
            return Ok(None);
        };
        let mut lines: Vec<String> = block.rows()[1..].to_vec();
        for (n, later) in blocks[i + 1..=j].iter().enumerate() {
            lines.push(String::new());
            let pad = " ".repeat(TAB_WIDTH * later.indent_level());
            let take = if i + 1 + n == j { later.len() - 1 } else { later.len() };
            lines.extend(later.rows()[..take].iter().map(|r| format!("{pad}{r}")));
        }
        out.push(Self::code_block(open.language, lines.join("\n")));
        Ok(Some(j + 1))
    }

    fn code_block(language: Option<String>, text: String) -> Element {
        if language.as_deref() == Some(CodeFence::BASE64) {
            if let Some(decoded) = CodeFence::decode_base64(&text) {
                return Element::CodeBlock {
                    language: Some(CodeFence::DECODED.to_string()),
                    text: decoded,
                };
            }
            log::debug!("base64 code block did not decode; keeping raw text");
        }
        Element::CodeBlock { language, text }
    }

    fn quote(&mut self, block: &Block, out: &mut Vec<Element>) -> Result<bool> {
        let Some((marker, prefix)) = BlockQuote::detect(block.first()) else {
            return Ok(false);
        };
        let mut rows = Vec::with_capacity(block.len());
        let mut positions = Vec::with_capacity(block.len());
        for (row, &pos) in block.rows().iter().zip(block.positions()) {
            let trimmed = row.trim_start();
            match BlockQuote::strip(trimmed, prefix) {
                Some(n) => {
                    rows.push(trimmed[n..].to_string());
                    positions.push(pos + n);
                }
                None => {
                    rows.push(row.clone());
                    positions.push(origin(row, pos));
                }
            }
        }
        let segments = segment_rows(&rows, &positions);
        let children = self.parse_blocks(&segments, 0, segments.len())?;
        push_merged(out, BlockQuote::wrap(marker, children));
        Ok(true)
    }

    fn rule(&mut self, block: &Block, out: &mut Vec<Element>) -> bool {
        if block.len() != 1 {
            return false;
        }
        let Some(kind) = Rule::classify(block.first()) else {
            return false;
        };
        out.push(match kind {
            RuleKind::Horizontal => Element::HorizontalRule { invisible: false },
            RuleKind::Invisible => Element::HorizontalRule { invisible: true },
            RuleKind::Section { columns } => Element::SectionBreak {
                columns,
                separator: block.first().trim().to_string(),
            },
        });
        true
    }

    fn list(&mut self, blocks: &[Block], i: usize, end: usize, out: &mut Vec<Element>) -> Result<Option<usize>> {
        let block = &blocks[i];
        if ListMarker::detect(block.first()).is_none() {
            return Ok(None);
        }

        let mut items: Vec<RawItem> = Vec::new();
        for (row, &pos) in block.rows().iter().zip(block.positions()) {
            if let Some(marker) = ListMarker::detect(row) {
                items.push(RawItem {
                    marker,
                    rows: vec![row[marker.len..].to_string()],
                    positions: vec![pos + marker.len],
                });
            } else if let Some(item) = items.last_mut() {
                item.rows.push(strip_columns(row, TAB_WIDTH));
                item.positions.push(pos);
            }
        }

        let (absorbed, next) = absorb_indented(blocks, i + 1, end);
        log::debug!(
            "block {i}: list with {} item(s), absorbing {} block(s)",
            items.len(),
            absorbed.len()
        );

        let single = items.len() == 1;
        let count = items.len();
        let mut built: Vec<(ListMarker, Vec<Element>)> = Vec::with_capacity(count);
        for (idx, item) in items.into_iter().enumerate() {
            let children = if single {
                let mut segments = resegment(&item.rows, &item.positions);
                segments.extend(absorbed.iter().cloned());
                self.parse_blocks(&segments, 0, segments.len())?
            } else {
                let inline = self.inline(&item.rows, &item.positions)?;
                if idx + 1 == count && !absorbed.is_empty() {
                    let mut children = promote(inline);
                    children.extend(self.parse_blocks(&absorbed, 0, absorbed.len())?);
                    children
                } else {
                    inline
                }
            };
            built.push((item.marker, children));
        }

        let mut group: Vec<(ListMarker, Vec<Element>)> = Vec::new();
        for (marker, children) in built {
            if group
                .first()
                .is_some_and(|(first, _)| !first.kind.same_list(marker.kind))
            {
                if let Some(list) = list_element(std::mem::take(&mut group)) {
                    push_merged(out, list);
                }
            }
            group.push((marker, children));
        }
        if let Some(list) = list_element(group) {
            push_merged(out, list);
        }
        Ok(Some(next))
    }

    fn table(&mut self, block: &Block, out: &mut Vec<Element>) -> Result<bool> {
        if block.len() < 2 || !block.first().contains(TableSyntax::PIPE) {
            return Ok(false);
        }
        let Some(column_alignment) = TableSyntax::separator(block.row(1)) else {
            return Ok(false);
        };
        let columns = column_alignment.len();

        let mut body_end = block.len();
        let mut caption = None;
        let mut id = None;
        if block.len() > 2
            && let Some((c, i)) = TableSyntax::caption(block.last())
        {
            body_end -= 1;
            caption = Some(c);
            id = i;
        }

        let positions = block.positions();
        let headers = self.table_row(block.row(0), positions[0], columns)?;
        let mut rows = Vec::with_capacity(body_end.saturating_sub(2));
        for k in 2..body_end {
            rows.push(self.table_row(block.row(k), positions[k], columns)?);
        }
        log::debug!("table with {columns} column(s) and {} row(s)", rows.len());
        out.push(Element::Table(Table {
            headers,
            rows,
            column_alignment,
            caption,
            id,
        }));
        Ok(true)
    }

    /// Parses each cell independently and pads the row to `columns` with
    /// absent cells.
    fn table_row(&mut self, row: &str, pos: usize, columns: usize) -> Result<Vec<TableCell>> {
        let base = origin(row, pos);
        let mut cells = Vec::with_capacity(columns);
        for raw in TableSyntax::split_cells(row).into_iter().take(columns) {
            let content = self.inline(&[raw.text], &[base + raw.offset])?;
            let auto_expand = matches!(content.as_slice(), [Element::FootnoteRef { .. }]);
            cells.push(TableCell {
                content: Some(content),
                auto_expand,
            });
        }
        cells.resize(
            columns,
            TableCell {
                content: None,
                auto_expand: false,
            },
        );
        Ok(cells)
    }

    fn definition(&mut self, blocks: &[Block], i: usize, end: usize, out: &mut Vec<Element>) -> Result<Option<usize>> {
        let block = &blocks[i];

        if let Some(rest) = Definition::description(block.first()) {
            let (mut rows, mut positions) = block.to_owned_rows();
            positions[0] += rows[0].len() - rest.len();
            rows[0] = rest.to_string();
            let mut segments = resegment(&rows, &positions);
            let (absorbed, next) = absorb_indented(blocks, i + 1, end);
            segments.extend(absorbed);
            let description = self.parse_blocks(&segments, 0, segments.len())?;
            attach_description(out, description);
            return Ok(Some(next));
        }

        let rows = block.rows();
        if rows[1..]
            .iter()
            .any(|r| Definition::description(r.trim_start()).is_some())
        {
            let mut entries = Vec::new();
            let mut current = DefinitionEntry {
                terms: vec![],
                descriptions: vec![],
            };
            for (row, &pos) in rows.iter().zip(block.positions()) {
                let trimmed = row.trim_start();
                if let Some(rest) = Definition::description(trimmed) {
                    let offset = pos + (trimmed.len() - rest.len());
                    current
                        .descriptions
                        .push(self.inline(&[rest.to_string()], &[offset])?);
                } else {
                    if !current.descriptions.is_empty() {
                        entries.push(std::mem::replace(
                            &mut current,
                            DefinitionEntry {
                                terms: vec![],
                                descriptions: vec![],
                            },
                        ));
                    }
                    current.terms.push(self.inline(&[trimmed.to_string()], &[pos])?);
                }
            }
            entries.push(current);
            push_merged(out, Element::DefinitionList { entries });
            return Ok(Some(i + 1));
        }

        let next_is_description = i + 1 < end
            && blocks[i + 1].indent_level() == 0
            && Definition::description(blocks[i + 1].first()).is_some();
        if next_is_description && !is_header_row(block.first()) {
            let mut terms = Vec::with_capacity(block.len());
            for (row, &pos) in rows.iter().zip(block.positions()) {
                terms.push(self.inline(&[row.trim_start().to_string()], &[pos])?);
            }
            push_merged(
                out,
                Element::DefinitionList {
                    entries: vec![DefinitionEntry {
                        terms,
                        descriptions: vec![],
                    }],
                },
            );
            return Ok(Some(i + 1));
        }
        Ok(None)
    }

    fn footnote_definition(&mut self, blocks: &[Block], i: usize, end: usize) -> Result<Option<usize>> {
        let block = &blocks[i];
        let Some((key, rest)) = FootnoteDefinition::parse(block.first()) else {
            return Ok(None);
        };
        let key = key.to_string();
        let (mut rows, mut positions) = block.to_owned_rows();
        positions[0] += rows[0].len() - rest.len();
        rows[0] = rest.to_string();
        let mut segments = resegment(&rows, &positions);
        let (absorbed, next) = absorb_indented(blocks, i + 1, end);
        segments.extend(absorbed);
        let children = self.parse_blocks(&segments, 0, segments.len())?;
        log::debug!("footnote [^{key}] defined");
        self.footnotes.define(&key, children);
        Ok(Some(next))
    }

    fn setext(&mut self, block: &Block, out: &mut Vec<Element>) -> Result<bool> {
        if block.len() < 2 {
            return Ok(false);
        }
        let Some(level) = SetextHeader::underline(block.last()) else {
            return Ok(false);
        };
        let n = block.len() - 1;
        let children = self.inline(&block.rows()[..n], &block.positions()[..n])?;
        out.push(Element::Header {
            level,
            is_prefix_style: false,
            children,
        });
        Ok(true)
    }

    fn atx(&mut self, block: &Block, out: &mut Vec<Element>) -> Result<bool> {
        let Some((level, content)) = AtxHeader::parse(block.first()) else {
            return Ok(false);
        };
        let after_marker = &block.first()[level as usize..];
        let lead = level as usize + after_marker.len() - after_marker.trim_start().len();
        let offset = block.positions()[0] + lead;
        let children = self.inline(&[content.to_string()], &[offset])?;
        out.push(Element::Header {
            level,
            is_prefix_style: true,
            children,
        });
        if let Some(rest) = block.slice(1, block.len()) {
            let (rows, positions) = rest.to_owned_rows();
            let segments = resegment(&rows, &positions);
            out.extend(self.parse_blocks(&segments, 0, segments.len())?);
        }
        Ok(true)
    }

    fn paragraph(&mut self, block: &Block, out: &mut Vec<Element>) -> Result<()> {
        let inline = self.inline(block.rows(), block.positions())?;
        for element in promote(inline) {
            push_merged(out, element);
        }
        Ok(())
    }
}

/// Splits inline output into paragraphs, lifting block-scope elements out.
fn promote(inline: Vec<Element>) -> Vec<Element> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for element in inline {
        if element.is_block() {
            if !run.is_empty() {
                out.push(Element::Paragraph(std::mem::take(&mut run)));
            }
            out.push(element);
        } else {
            run.push(element);
        }
    }
    if !run.is_empty() {
        out.push(Element::Paragraph(run));
    }
    out
}

/// Collects the indented blocks after `from`, one level shallower.
fn absorb_indented(blocks: &[Block], from: usize, end: usize) -> (Vec<Block>, usize) {
    let mut absorbed = Vec::new();
    let mut j = from;
    while j < end && blocks[j].indent_level() > 0 {
        absorbed.push(blocks[j].with_indent(blocks[j].indent_level() - 1));
        j += 1;
    }
    (absorbed, j)
}

fn attach_description(out: &mut Vec<Element>, description: Vec<Element>) {
    match out.last_mut() {
        Some(Element::DefinitionList { entries }) => match entries.last_mut() {
            Some(entry) => entry.descriptions.push(description),
            None => entries.push(DefinitionEntry {
                terms: vec![],
                descriptions: vec![description],
            }),
        },
        Some(Element::Paragraph(_)) => {
            let terms = match out.pop() {
                Some(Element::Paragraph(children)) => vec![children],
                _ => vec![],
            };
            out.push(Element::DefinitionList {
                entries: vec![DefinitionEntry {
                    terms,
                    descriptions: vec![description],
                }],
            });
        }
        _ => out.push(Element::DefinitionList {
            entries: vec![DefinitionEntry {
                terms: vec![],
                descriptions: vec![description],
            }],
        }),
    }
}

fn list_element(group: Vec<(ListMarker, Vec<Element>)>) -> Option<Element> {
    let first = group.first().map(|(m, _)| *m)?;
    Some(match first.kind {
        ItemKind::Task { .. } => Element::TaskList {
            items: group
                .into_iter()
                .map(|(marker, children)| TaskItem {
                    checked: matches!(marker.kind, ItemKind::Task { checked: true }),
                    children,
                })
                .collect(),
        },
        ItemKind::List(kind) => Element::List {
            kind,
            start: first.value.unwrap_or(1),
            items: group
                .into_iter()
                .map(|(marker, children)| ListItem {
                    value: marker.value,
                    children,
                })
                .collect(),
        },
    })
}

/// Byte offset of the start of `row`, given the offset of its first non-blank character.
fn origin(row: &str, first_non_blank: usize) -> usize {
    first_non_blank.saturating_sub(leading_indent(row).1)
}

/// Re-segments derived rows whose positions point at their first non-blank character.
fn resegment(rows: &[String], positions: &[usize]) -> Vec<Block> {
    let origins: Vec<usize> = rows
        .iter()
        .zip(positions)
        .map(|(r, &p)| origin(r, p))
        .collect();
    segment_rows(rows, &origins)
}
