use std::sync::OnceLock;

use regex::Regex;

/// Bare `http://` and `https://` runs in running text.
pub struct BareUrl;

impl BareUrl {
    pub const SCHEMES: [&'static str; 2] = ["http://", "https://"];

    /// Length in characters of the URL at the start of `rest`, if there is one.
    /// Trailing sentence punctuation is left out of the link.
    pub fn match_len(rest: &str) -> Option<usize> {
        let m = url_regex().find(rest)?;
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '\'', '"']);
        (!url.ends_with("://")).then(|| url.chars().count())
    }
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[^\s<>\[\]]+").expect("valid url regex"))
}
