/// Code span inline type with owned delimiter constant.
///
/// Code spans are raw zones: their content is copied verbatim. The doubled
/// form lets the content carry single back-ticks.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: char = '`';
    /// Longest opening run recognised as a code span delimiter.
    pub const MAX_RUN: usize = 2;
}
