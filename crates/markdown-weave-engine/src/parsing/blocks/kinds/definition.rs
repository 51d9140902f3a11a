/// Definition list descriptions: rows opened by `:` and whitespace.
pub struct Definition;

impl Definition {
    pub const MARKER: char = ':';

    /// The description text of a `: ...` row.
    pub fn description(row: &str) -> Option<&str> {
        let rest = row.strip_prefix(Self::MARKER)?;
        match rest.chars().next() {
            None => Some(""),
            Some(' ') | Some('\t') => Some(rest.trim_start()),
            Some(_) => None,
        }
    }
}
