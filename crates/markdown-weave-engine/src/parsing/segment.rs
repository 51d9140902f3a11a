//! # Block Segmenter
//!
//! Splits raw text into [`Block`]s: runs of non-blank rows delimited by blank
//! lines. Nothing inside a block is interpreted here beyond its indentation.

use std::sync::Arc;

/// Columns per indent level. Tabs always count as a full level.
pub const TAB_WIDTH: usize = 4;

/// A read-only view over a contiguous run of source rows.
///
/// Row storage is shared: [`Block::slice`] and [`Block::with_indent`] produce
/// new views over the same rows without copying them.
///
/// # Invariants
///
/// - `first_row <= last_row < rows.len()`
/// - no row in the view is blank
#[derive(Debug, Clone)]
pub struct Block {
    rows: Arc<[String]>,
    positions: Arc<[usize]>,
    first_row: usize,
    last_row: usize,
    indent_level: usize,
}

impl Block {
    /// Builds a block over owned rows; `None` when there are no rows.
    pub fn from_rows(rows: Vec<String>, positions: Vec<usize>, indent_level: usize) -> Option<Self> {
        if rows.is_empty() || rows.len() != positions.len() {
            return None;
        }
        let last_row = rows.len() - 1;
        Some(Self {
            rows: rows.into(),
            positions: positions.into(),
            first_row: 0,
            last_row,
            indent_level,
        })
    }

    /// Rows of this view.
    pub fn rows(&self) -> &[String] {
        &self.rows[self.first_row..=self.last_row]
    }

    /// Absolute offset of each row's first non-blank character.
    pub fn positions(&self) -> &[usize] {
        &self.positions[self.first_row..=self.last_row]
    }

    pub fn row(&self, i: usize) -> &str {
        &self.rows()[i]
    }

    pub fn first(&self) -> &str {
        &self.rows[self.first_row]
    }

    pub fn last(&self) -> &str {
        &self.rows[self.last_row]
    }

    pub fn len(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn last_row(&self) -> usize {
        self.last_row
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// A view over rows `from..to` (relative to this view). `None` when empty.
    pub fn slice(&self, from: usize, to: usize) -> Option<Block> {
        let to = to.min(self.len());
        if from >= to {
            return None;
        }
        Some(Block {
            rows: Arc::clone(&self.rows),
            positions: Arc::clone(&self.positions),
            first_row: self.first_row + from,
            last_row: self.first_row + to - 1,
            indent_level: self.indent_level,
        })
    }

    /// The same rows with a different indent level.
    pub fn with_indent(&self, indent_level: usize) -> Block {
        Block {
            indent_level,
            ..self.clone()
        }
    }

    /// Owned copies of the rows and positions, for building derived blocks.
    pub fn to_owned_rows(&self) -> (Vec<String>, Vec<usize>) {
        (self.rows().to_vec(), self.positions().to_vec())
    }
}

/// Splits `text` into rows, recording the byte offset at which each row starts.
///
/// CR/LF and lone CR are normalised to LF first; offsets refer to the normalised text.
pub fn split_rows(text: &str) -> (Vec<String>, Vec<usize>) {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut rows = Vec::new();
    let mut positions = Vec::new();
    let mut offset = 0usize;
    for line in normalized.split('\n') {
        rows.push(line.to_string());
        positions.push(offset);
        offset += line.len() + 1;
    }
    (rows, positions)
}

/// Segments raw text into blocks.
pub fn segment(text: &str) -> Vec<Block> {
    let (rows, positions) = split_rows(text);
    segment_rows(&rows, &positions)
}

/// Segments already-split rows. `positions[i]` is the offset of byte 0 of `rows[i]`.
pub fn segment_rows(rows: &[String], positions: &[usize]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current = Pending::default();

    for (line, &pos) in rows.iter().zip(positions) {
        let (columns, bytes) = leading_indent(line);
        if bytes == line.len() {
            current.flush(&mut blocks);
            continue;
        }

        if current.rows.is_empty() {
            current.first_indent = columns;
            current.push(line[bytes..].to_string(), pos + bytes);
            if is_header_row(&line[bytes..]) {
                current.flush(&mut blocks);
            }
            continue;
        }

        let row = if columns < current.first_indent {
            line[bytes..].to_string()
        } else {
            strip_columns(line, current.first_indent)
        };
        current.push(row, pos + bytes);
    }
    current.flush(&mut blocks);
    blocks
}

#[derive(Default)]
struct Pending {
    rows: Vec<String>,
    positions: Vec<usize>,
    first_indent: usize,
}

impl Pending {
    fn push(&mut self, row: String, pos: usize) {
        self.rows.push(row);
        self.positions.push(pos);
    }

    fn flush(&mut self, out: &mut Vec<Block>) {
        let rows = std::mem::take(&mut self.rows);
        let positions = std::mem::take(&mut self.positions);
        if let Some(block) = Block::from_rows(rows, positions, self.first_indent / TAB_WIDTH) {
            out.push(block);
        }
        self.first_indent = 0;
    }
}

/// Leading whitespace of `line` as `(columns, bytes)`.
pub fn leading_indent(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for c in line.chars() {
        match c {
            ' ' => columns += 1,
            '\t' => columns += TAB_WIDTH,
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

/// Removes up to `columns` columns of leading whitespace. Whatever
/// indentation is left is rewritten as spaces, so no tab survives the cut.
pub fn strip_columns(line: &str, columns: usize) -> String {
    let (width, bytes) = leading_indent(line);
    let mut out = " ".repeat(width.saturating_sub(columns));
    out.push_str(&line[bytes..]);
    out
}

/// Whether a row opens a single-line `#` header, which ends its block at once.
pub fn is_header_row(row: &str) -> bool {
    let hashes = row.chars().take_while(|&c| c == '#').count();
    (1..=6).contains(&hashes)
        && row[hashes..]
            .chars()
            .next()
            .is_none_or(|c| c == ' ' || c == '\t')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows_of(blocks: &[Block]) -> Vec<Vec<String>> {
        blocks.iter().map(|b| b.rows().to_vec()).collect()
    }

    #[test]
    fn blank_lines_separate_blocks() {
        let blocks = segment("one\ntwo\n\n\nthree\n");
        assert_eq!(
            rows_of(&blocks),
            vec![vec!["one".to_string(), "two".to_string()], vec!["three".to_string()]]
        );
    }

    #[test]
    fn header_row_ends_its_block() {
        let blocks = segment("# Title\nbody text\nmore");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].rows(), &["# Title".to_string()]);
        assert_eq!(blocks[1].len(), 2);
    }

    #[test]
    fn hashtags_do_not_end_a_block() {
        let blocks = segment("#tag line\nnext");
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn indentation_is_measured_in_levels() {
        let blocks = segment("    code\n\t\tdeeper\n\npara");
        assert_eq!(blocks[0].indent_level(), 1);
        assert_eq!(blocks[0].rows(), &["code".to_string(), "    deeper".to_string()]);
        assert_eq!(blocks[1].indent_level(), 0);
    }

    #[test]
    fn narrower_indentation_is_clipped() {
        let blocks = segment("      six\n  two\n        eight");
        assert_eq!(
            blocks[0].rows(),
            &["six".to_string(), "two".to_string(), "  eight".to_string()]
        );
    }

    #[test]
    fn positions_point_at_first_non_blank_character() {
        let blocks = segment("ab\n  cd\n\nef");
        assert_eq!(blocks[0].positions(), &[0, 5]);
        assert_eq!(blocks[1].positions(), &[9]);
    }

    #[test]
    fn crlf_is_normalised() {
        let blocks = segment("a\r\nb\r\n\r\nc");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].rows(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        assert!(segment("").is_empty());
        assert!(segment(" \n\t\n").is_empty());
    }

    #[test]
    fn slices_share_storage() {
        let block = segment("a\nb\nc").remove(0);
        let tail = block.slice(1, 3).unwrap();
        assert_eq!(tail.rows(), &["b".to_string(), "c".to_string()]);
        assert_eq!(tail.first_row(), 1);
        assert_eq!(tail.last_row(), 2);
        assert!(Arc::ptr_eq(&block.rows, &tail.rows));
        assert!(block.slice(3, 3).is_none());
    }

    #[test]
    fn every_non_blank_line_appears_once_in_order() {
        let text = "alpha\nbeta\n\n# head\ngamma\n\n\ndelta\n";
        let blocks = segment(text);
        let rejoined: Vec<String> = blocks.iter().flat_map(|b| b.rows().to_vec()).collect();
        let expected: Vec<String> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        assert_eq!(rejoined, expected);
    }

    #[test]
    fn strip_columns_splits_tabs() {
        assert_eq!(strip_columns("\tx", 2), "  x");
        assert_eq!(strip_columns("   x", 8), "x");
        assert_eq!(strip_columns("\t\t\tx", 4), "        x");
        assert_eq!(strip_columns(" \tx", 0), "     x");
    }
}
