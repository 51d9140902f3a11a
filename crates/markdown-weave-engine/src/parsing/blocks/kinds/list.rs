use crate::model::ListKind;

/// The kind of item a marker opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    List(ListKind),
    Task { checked: bool },
}

impl ItemKind {
    /// Whether two items belong in the same list.
    pub fn same_list(self, other: ItemKind) -> bool {
        match (self, other) {
            (ItemKind::Task { .. }, ItemKind::Task { .. }) => true,
            (a, b) => a == b,
        }
    }
}

/// A list marker at the start of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub kind: ItemKind,
    /// Numeral written on an ordered item.
    pub value: Option<u64>,
    /// Bytes taken by the marker and the whitespace after it.
    pub len: usize,
}

impl ListMarker {
    pub const BULLETS: [char; 3] = ['*', '+', '-'];
    pub const HASH: &'static str = "#.";
    const MAX_DIGITS: usize = 9;

    /// Recognises a marker at column 0. Markers must be followed by
    /// whitespace or the end of the row, so `2.5` and `*foo` are not items.
    pub fn detect(row: &str) -> Option<ListMarker> {
        let (kind, value, marker_len) = Self::marker(row)?;
        let rest = &row[marker_len..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let spaces = rest.len() - rest.trim_start().len();
        Some(ListMarker {
            kind,
            value,
            len: marker_len + spaces,
        })
    }

    fn marker(row: &str) -> Option<(ItemKind, Option<u64>, usize)> {
        let first = row.chars().next()?;
        if Self::BULLETS.contains(&first) {
            return Some((ItemKind::List(ListKind::Bullet(first)), None, 1));
        }
        if row.starts_with(Self::HASH) {
            return Some((ItemKind::List(ListKind::Hash), None, Self::HASH.len()));
        }
        for (text, checked) in [("[ ]", false), ("[x]", true), ("[X]", true)] {
            if row.starts_with(text) {
                return Some((ItemKind::Task { checked }, None, text.len()));
            }
        }
        let digits = row.chars().take_while(char::is_ascii_digit).count();
        if (1..=Self::MAX_DIGITS).contains(&digits) && row[digits..].starts_with('.') {
            let value = row[..digits].parse().ok()?;
            return Some((ItemKind::List(ListKind::Ordered), Some(value), digits + 1));
        }
        None
    }
}
