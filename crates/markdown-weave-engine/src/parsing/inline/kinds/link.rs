use std::sync::OnceLock;

use regex::Regex;

use crate::model::MediaSource;

/// Links, images and footnote references: `[..](..)`, `![..](..)`, `[..][ref]`,
/// `[^key]` and `^[inline note]`.
pub struct Link;

impl Link {
    pub const OPEN: char = '[';
    pub const CLOSE: char = ']';
    pub const IMAGE: char = '!';
    pub const FOOTNOTE: char = '^';
    pub const TARGET_OPEN: char = '(';
    pub const TARGET_CLOSE: char = ')';

    /// Parses the inside of a `( ... )` target: `url "title" WxH`, each part
    /// after the url optional.
    pub fn parse_target(inner: &str) -> Option<MediaSource> {
        let inner = inner.trim();
        let (url, mut rest) = match inner.find(char::is_whitespace) {
            Some(i) => (&inner[..i], inner[i..].trim_start()),
            None => (inner, ""),
        };
        let url = url.trim_start_matches('<').trim_end_matches('>');
        let mut source = MediaSource {
            url: url.to_string(),
            ..MediaSource::default()
        };

        if let Some(quoted) = rest.strip_prefix('"') {
            let end = quoted.find('"')?;
            source.title = Some(quoted[..end].to_string());
            rest = quoted[end + 1..].trim_start();
        }

        if !rest.is_empty() {
            let caps = size_regex().captures(rest)?;
            source.width = caps.get(1).and_then(|m| m.as_str().parse().ok());
            source.height = caps.get(2).and_then(|m| m.as_str().parse().ok());
        }
        Some(source)
    }

    /// Formats a source back into target syntax, without the parentheses.
    pub fn format_target(source: &MediaSource) -> String {
        let mut out = source.url.clone();
        if let Some(title) = &source.title {
            out.push_str(&format!(" \"{title}\""));
        }
        if source.width.is_some() || source.height.is_some() {
            out.push(' ');
            if let Some(w) = source.width {
                out.push_str(&w.to_string());
            }
            out.push('x');
            if let Some(h) = source.height {
                out.push_str(&h.to_string());
            }
        }
        out
    }
}

fn size_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)?x(\d+)?$").expect("valid size regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_url_title_and_size() {
        let src = Link::parse_target("img.png \"A cat\" 640x480").unwrap();
        assert_eq!(
            src,
            MediaSource {
                url: "img.png".into(),
                title: Some("A cat".into()),
                width: Some(640),
                height: Some(480),
            }
        );
    }

    #[test]
    fn size_parts_are_optional() {
        let src = Link::parse_target("a.png x200").unwrap();
        assert_eq!(src.width, None);
        assert_eq!(src.height, Some(200));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert_eq!(Link::parse_target("a.png nonsense"), None);
        assert_eq!(Link::parse_target("a.png \"unclosed"), None);
    }

    #[test]
    fn formatting_reverses_parsing() {
        let text = "a.png \"t\" 10x";
        let src = Link::parse_target(text).unwrap();
        assert_eq!(Link::format_target(&src), text);
    }
}
