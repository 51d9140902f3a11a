use crate::model::Element;

/// Paired-marker spans: `*`, `_`, `~`, `^` and `,,`.
///
/// The marker character decides the variant; doubling it selects the strong
/// form (`**` strong, `__` insert, `~~` delete).
pub struct Emphasis;

impl Emphasis {
    pub const MARKERS: [char; 3] = ['*', '_', '~'];
    pub const SUPER: char = '^';
    pub const SUB: char = ',';

    pub fn is_marker(c: char) -> bool {
        Self::MARKERS.contains(&c)
    }

    /// Builds the element for a completed span.
    pub fn wrap(marker: char, run: usize, children: Vec<Element>) -> Element {
        match (marker, run >= 2) {
            ('*', false) => Element::Emphasis(children),
            ('*', true) => Element::Strong(children),
            ('_', false) => Element::Underline(children),
            ('_', true) => Element::Insert(children),
            ('~', false) => Element::StrikeThrough(children),
            ('~', true) => Element::Delete(children),
            ('^', _) => Element::SuperScript(children),
            (',', _) => Element::SubScript(children),
            _ => Element::Emphasis(children),
        }
    }
}
