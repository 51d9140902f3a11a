/// Raw HTML handling for the `<` character.
pub struct HtmlTag;

/// Tags whose content is copied verbatim up to the matching close tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbatim {
    Script,
    TextArea,
}

impl HtmlTag {
    pub const OPEN: char = '<';
    pub const CLOSE: char = '>';

    /// Tags that turn the rest of a block into an HTML block when they open it.
    pub const BLOCK_TAGS: &'static [&'static str] = &[
        "address", "article", "aside", "blockquote", "body", "details", "div", "dl", "fieldset",
        "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "html",
        "iframe", "nav", "ol", "p", "pre", "section", "style", "table", "ul",
    ];

    /// Lower-cased tag name of a tag body such as `div class="x"` or `/div`.
    pub fn name(body: &str) -> String {
        body.trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase()
    }

    pub fn is_block_tag(body: &str) -> bool {
        let name = Self::name(body);
        Self::BLOCK_TAGS.contains(&name.as_str())
    }

    pub fn verbatim(body: &str) -> Option<Verbatim> {
        if body.starts_with('/') || body.ends_with('/') {
            return None;
        }
        match Self::name(body).as_str() {
            "script" => Some(Verbatim::Script),
            "textarea" => Some(Verbatim::TextArea),
            _ => None,
        }
    }

    /// Classifies `<body>` as an automatic link: `(url, is_mail)`.
    pub fn autolink(body: &str) -> Option<(String, bool)> {
        if body.is_empty() || body.chars().any(char::is_whitespace) {
            return None;
        }
        if body.contains(':') {
            let is_mail = body.to_ascii_lowercase().starts_with("mailto:");
            return Some((body.to_string(), is_mail));
        }
        if body.contains('@') {
            return Some((body.to_string(), true));
        }
        None
    }

    /// Whether `body` can be the inside of a tag at all.
    pub fn is_tag_body(body: &str) -> bool {
        body.chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
    }
}

impl Verbatim {
    pub fn close_tag(self) -> &'static str {
        match self {
            Verbatim::Script => "</script>",
            Verbatim::TextArea => "</textarea>",
        }
    }
}
