/// Emoji shorthands (`:name:`) and emoticons.
///
/// Both are only recognised when an emoji lookup is configured; the lookup
/// has the final say on whether a candidate is an emoji at all.
pub struct Emoji;

impl Emoji {
    pub const COLON: char = ':';

    /// Emoticons in match priority order: longer forms come before their prefixes.
    pub const EMOTICONS: &'static [&'static str] = &[
        ">:-(", ">:-)", ">:(", ">:)", "':-)", "':)", ":'-(", ":'(", ":-)", ":-(", ":-D",
        ":-P", ":-|", ":-O", ";-)", "8-)", ":)", ":(", ":D", ":P", ":|", ":O", ";)", "=D",
        "=)", "^^",
    ];

    /// Characters an emoticon can start with.
    pub fn may_start(c: char) -> bool {
        matches!(c, ':' | ';' | '8' | '>' | '\'' | '=' | '^')
    }

    pub fn is_name_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
    }

    /// Candidates that match the start of `upcoming`, longest first.
    pub fn candidates(upcoming: &str) -> impl Iterator<Item = &'static str> + '_ {
        Self::EMOTICONS
            .iter()
            .copied()
            .filter(move |e| upcoming.starts_with(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_emoticons_are_tried_first() {
        let found: Vec<_> = Emoji::candidates(">:-( grr").collect();
        assert_eq!(found.first(), Some(&">:-("));
        let found: Vec<_> = Emoji::candidates(":-) hi").collect();
        assert_eq!(found, vec![":-)"]);
    }

    #[test]
    fn every_emoticon_starts_with_a_trigger() {
        for e in Emoji::EMOTICONS {
            let first = e.chars().next().unwrap();
            assert!(Emoji::may_start(first), "{e}");
        }
    }
}
