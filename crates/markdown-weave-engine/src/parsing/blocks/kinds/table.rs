use std::sync::OnceLock;

use regex::Regex;

use crate::model::Alignment;

/// Pipe tables: a header row, an alignment row, body rows and an optional
/// `[caption][id]` row.
pub struct TableSyntax;

/// One cell of a row: byte offset of its trimmed text within the row, and the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    pub offset: usize,
    pub text: String,
}

impl TableSyntax {
    pub const PIPE: char = '|';

    /// Column alignments declared by a separator row.
    pub fn separator(row: &str) -> Option<Vec<Alignment>> {
        if !row.contains(Self::PIPE) || !separator_regex().is_match(row) {
            return None;
        }
        let alignments = Self::split_cells(row)
            .into_iter()
            .map(|cell| {
                let t = cell.text.as_str();
                match (t.starts_with(':'), t.ends_with(':')) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::Default,
                }
            })
            .collect();
        Some(alignments)
    }

    /// The caption and optional id of a trailing `[caption][id]` row.
    pub fn caption(row: &str) -> Option<(String, Option<String>)> {
        let caps = caption_regex().captures(row.trim())?;
        let caption = caps.get(1)?.as_str().to_string();
        let id = caps.get(2).map(|m| m.as_str().to_string());
        Some((caption, id))
    }

    /// Splits a row on unescaped pipes outside code spans. One leading and one
    /// trailing pipe are optional.
    pub fn split_cells(row: &str) -> Vec<RawCell> {
        let mut bounds = Vec::new();
        let mut in_code = false;
        let mut escaped = false;
        for (i, c) in row.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '`' => in_code = !in_code,
                Self::PIPE if !in_code => bounds.push(i),
                _ => {}
            }
        }

        let trimmed_start = row.len() - row.trim_start().len();
        let trimmed_end = row.trim_end().len();
        let mut starts = vec![0];
        let mut ends = Vec::new();
        for &b in &bounds {
            ends.push(b);
            starts.push(b + 1);
        }
        ends.push(row.len());

        let mut cells: Vec<RawCell> = starts
            .into_iter()
            .zip(ends)
            .map(|(s, e)| {
                let raw = &row[s..e];
                let lead = raw.len() - raw.trim_start().len();
                RawCell {
                    offset: s + lead,
                    text: raw.trim().to_string(),
                }
            })
            .collect();

        if bounds.first().is_some_and(|&b| b == trimmed_start) && !cells.is_empty() {
            cells.remove(0);
        }
        if bounds.last().is_some_and(|&b| b + 1 == trimmed_end) && !cells.is_empty() {
            cells.pop();
        }
        cells
    }
}

fn separator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?\s*$").expect("valid separator regex")
    })
}

fn caption_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]|]*)\](?:\[([^\]|]*)\])?$").expect("valid caption regex"))
}
