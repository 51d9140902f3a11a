/// `[^key]: text` footnote definitions.
pub struct FootnoteDefinition;

impl FootnoteDefinition {
    pub const OPEN: &'static str = "[^";

    /// The key and the text following the colon.
    pub fn parse(row: &str) -> Option<(&str, &str)> {
        let rest = row.strip_prefix(Self::OPEN)?;
        let close = rest.find(']')?;
        let key = &rest[..close];
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }
        let body = rest[close + 1..].strip_prefix(':')?;
        Some((key, body.trim_start()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definitions() {
        assert_eq!(FootnoteDefinition::parse("[^1]: text"), Some(("1", "text")));
        assert_eq!(FootnoteDefinition::parse("[^note]:"), Some(("note", "")));
        assert_eq!(FootnoteDefinition::parse("[^1] text"), None);
        assert_eq!(FootnoteDefinition::parse("[link]: url"), None);
    }
}
