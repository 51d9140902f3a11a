/// `{{ expression }}` placeholders, handed to the injected evaluator.
pub struct Script;

impl Script {
    pub const OPEN: &'static str = "{{";
    pub const CLOSE: &'static str = "}}";
}

/// Escapable characters after a backslash.
pub const ESCAPABLE: &str = "\\`*_{}[]()#+-.!~^<>&|:\"'=,/";

pub fn is_escapable(c: char) -> bool {
    ESCAPABLE.contains(c)
}
