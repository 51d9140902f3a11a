/// `#`-prefixed headers.
pub struct AtxHeader;

impl AtxHeader {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Level and content of a header row, with any closing `#` run removed.
    pub fn parse(row: &str) -> Option<(u8, &str)> {
        let level = row.chars().take_while(|&c| c == Self::MARKER).count();
        if !(1..=Self::MAX_LEVEL).contains(&level) {
            return None;
        }
        let rest = &row[level..];
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            return None;
        }
        let content = rest.trim();
        let without_closing = content.trim_end_matches(Self::MARKER);
        let content = if without_closing.is_empty() || without_closing.ends_with([' ', '\t']) {
            without_closing.trim_end()
        } else {
            content
        };
        Some((level as u8, content))
    }
}

/// Headers underlined with `=` (level 1) or `-` (level 2).
pub struct SetextHeader;

impl SetextHeader {
    pub fn underline(row: &str) -> Option<u8> {
        let t = row.trim();
        if t.is_empty() {
            None
        } else if t.chars().all(|c| c == '=') {
            Some(1)
        } else if t.chars().all(|c| c == '-') {
            Some(2)
        } else {
            None
        }
    }
}
