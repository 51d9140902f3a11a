use crate::model::{Element, QuoteKind};

/// What a prefix-marked block becomes once its content is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMarker {
    Quote(QuoteKind),
    InsertBlocks,
    DeleteBlocks,
}

/// Block quote and alignment prefixes.
///
/// All prefix syntax lives here, not in the dispatcher.
pub struct BlockQuote;

impl BlockQuote {
    /// Prefixes in match order.
    pub const PREFIXES: &'static [(&'static str, QuoteMarker)] = &[
        ("+>", QuoteMarker::InsertBlocks),
        ("~>", QuoteMarker::DeleteBlocks),
        ("->", QuoteMarker::Quote(QuoteKind::Right)),
        ("<-", QuoteMarker::Quote(QuoteKind::Left)),
        ("<>", QuoteMarker::Quote(QuoteKind::Center)),
        ("<<", QuoteMarker::Quote(QuoteKind::Margin)),
        (">", QuoteMarker::Quote(QuoteKind::Quote)),
    ];

    /// The marker opening `row`, with its prefix text.
    pub fn detect(row: &str) -> Option<(QuoteMarker, &'static str)> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| Self::strip(row, prefix).is_some())
            .map(|&(prefix, marker)| (marker, prefix))
    }

    /// Bytes to remove from `row` for `prefix`: the prefix plus one space.
    ///
    /// The prefix must be followed by whitespace or the end of the row; a
    /// plain `>` may also be followed by another `>` (nesting).
    pub fn strip(row: &str, prefix: &str) -> Option<usize> {
        let rest = row.strip_prefix(prefix)?;
        match rest.chars().next() {
            None => Some(prefix.len()),
            Some(' ') | Some('\t') => Some(prefix.len() + 1),
            Some('>') if prefix == ">" => Some(prefix.len()),
            Some(_) => None,
        }
    }

    pub fn prefix(marker: QuoteMarker) -> &'static str {
        Self::PREFIXES
            .iter()
            .find(|(_, m)| *m == marker)
            .map(|(p, _)| *p)
            .unwrap_or(">")
    }

    pub fn wrap(marker: QuoteMarker, children: Vec<Element>) -> Element {
        match marker {
            QuoteMarker::Quote(kind) => Element::BlockQuote { kind, children },
            QuoteMarker::InsertBlocks => Element::InsertBlocks(children),
            QuoteMarker::DeleteBlocks => Element::DeleteBlocks(children),
        }
    }
}
