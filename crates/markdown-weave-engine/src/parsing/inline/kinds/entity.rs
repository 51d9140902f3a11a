/// Character references (`&amp;`, `&#169;`, `&#x1F600;`) and the arrow
/// shorthands that produce them.
pub struct Entity;

impl Entity {
    pub const AMP: char = '&';
    pub const TERMINATOR: char = ';';
    const MAX_NAME: usize = 32;

    /// Shorthands beginning with `<`, longest first.
    pub const LT_SHORTHANDS: &'static [(&'static str, &'static str)] = &[
        ("<->", "harr"),
        ("<=>", "hArr"),
        ("<<", "laquo"),
        ("<-", "larr"),
        ("<=", "le"),
        ("<>", "ne"),
    ];

    /// Shorthands beginning with another character.
    pub const OTHER_SHORTHANDS: &'static [(&'static str, &'static str)] = &[
        ("->", "rarr"),
        ("=>", "rArr"),
        (">>", "raquo"),
        (">=", "ge"),
    ];

    /// Returns the entity body (without `&` and `;`) when `rest` begins with a
    /// well-formed reference. `rest` starts just after the `&`.
    pub fn scan(rest: &str) -> Option<&str> {
        let end = rest.find(Self::TERMINATOR)?;
        let body = &rest[..end];
        if body.is_empty() || body.len() > Self::MAX_NAME {
            return None;
        }
        Self::is_valid(body).then_some(body)
    }

    fn is_valid(body: &str) -> bool {
        if let Some(num) = body.strip_prefix('#') {
            let value = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            return value.and_then(char::from_u32).is_some();
        }
        if !body.chars().all(|c| c.is_ascii_alphanumeric()) {
            return false;
        }
        let raw = format!("&{body};");
        html_escape::decode_html_entities(&raw) != raw
    }

    /// The character a reference stands for, if it is known.
    pub fn decode(body: &str) -> String {
        let raw = format!("&{body};");
        html_escape::decode_html_entities(&raw).into_owned()
    }
}
