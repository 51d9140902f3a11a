/// `//` comment blocks. Each row loses its first two characters.
pub struct Comment;

impl Comment {
    pub const PREFIX: &'static str = "//";

    pub fn is_comment(row: &str) -> bool {
        row.starts_with(Self::PREFIX)
    }

    pub fn body(rows: &[String]) -> String {
        rows.iter()
            .map(|r| r.strip_prefix(Self::PREFIX).unwrap_or(r))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
