use serde::Serialize;

/// Flavour of a prefix-marked block (`>`, `<<`, `->`, `<-`, `<>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuoteKind {
    /// `>` - a plain block quote.
    Quote,
    /// `<<` - content set in the margin.
    Margin,
    /// `<-` - explicitly left aligned.
    Left,
    /// `->` - right aligned.
    Right,
    /// `<>` - centred.
    Center,
}

/// The marker family of a list. Items only share a list with items of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListKind {
    /// `*`, `+` or `-` bullets; the character is kept so a different bullet starts a new list.
    Bullet(char),
    /// `N.` items carrying their own numerals.
    Ordered,
    /// `#.` auto-numbered items.
    Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListItem {
    /// The numeral written in the source for ordered items.
    pub value: Option<u64>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaskItem {
    pub checked: bool,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Alignment {
    Default,
    Left,
    Center,
    Right,
}

/// A table cell. `content` is `None` for cells missing from a ragged row,
/// which is distinct from a present but empty cell (`Some(vec![])`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableCell {
    pub content: Option<Vec<Element>>,
    /// Set when the cell holds nothing but a single footnote reference.
    pub auto_expand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Table {
    pub headers: Vec<TableCell>,
    pub rows: Vec<Vec<TableCell>>,
    pub column_alignment: Vec<Alignment>,
    pub caption: Option<String>,
    pub id: Option<String>,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.column_alignment.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DefinitionEntry {
    pub terms: Vec<Vec<Element>>,
    pub descriptions: Vec<Vec<Element>>,
}

/// One image/video source, or the body of a reference definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MediaSource {
    pub url: String,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LinkTarget {
    Inline { url: String, title: Option<String> },
    /// A named reference, resolved against [`References`](super::References) at render time.
    Reference(String),
}

/// A node of the document tree.
///
/// The variant set is closed. Shared behaviour lives in the capability
/// methods below (`is_block`, `same_metadata`, `editable_text`, `assemble`, ...)
/// instead of in a trait hierarchy. Children are owned exclusively; nothing
/// points back at its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Element {
    // Leaf inline elements
    Text(String),
    InlineCode(String),
    /// Entity body without the surrounding `&` and `;` (`amp`, `#169`, `#x1F600`).
    HtmlEntity(String),
    EmojiRef {
        shorthand: String,
        id: String,
    },
    LineBreak,
    AutoLink {
        url: String,
        is_mail: bool,
    },
    FootnoteRef {
        key: String,
    },
    ScriptPlaceholder {
        source: String,
        value: String,
    },
    /// Visible marker left where an expression failed to evaluate.
    ScriptError {
        source: String,
        message: String,
    },
    HashTag(String),
    /// A raw inline HTML tag, or a verbatim `<script>`/`<textarea>` span.
    HtmlTag(String),

    // Composite inline elements
    Emphasis(Vec<Element>),
    Strong(Vec<Element>),
    Underline(Vec<Element>),
    StrikeThrough(Vec<Element>),
    SuperScript(Vec<Element>),
    SubScript(Vec<Element>),
    Insert(Vec<Element>),
    Delete(Vec<Element>),
    Link {
        target: LinkTarget,
        children: Vec<Element>,
    },
    Multimedia {
        sources: Vec<MediaSource>,
        reference: Option<String>,
        children: Vec<Element>,
    },

    // Block elements
    Paragraph(Vec<Element>),
    Header {
        level: u8,
        is_prefix_style: bool,
        children: Vec<Element>,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    BlockQuote {
        kind: QuoteKind,
        children: Vec<Element>,
    },
    List {
        kind: ListKind,
        start: u64,
        items: Vec<ListItem>,
    },
    TaskList {
        items: Vec<TaskItem>,
    },
    Table(Table),
    DefinitionList {
        entries: Vec<DefinitionEntry>,
    },
    Footnote {
        key: String,
        children: Vec<Element>,
    },
    Section {
        columns: u32,
        separator: String,
        children: Vec<Element>,
    },
    SectionBreak {
        columns: u32,
        separator: String,
    },
    HorizontalRule {
        invisible: bool,
    },
    CommentBlock(String),
    HtmlBlock(String),
    InsertBlocks(Vec<Element>),
    DeleteBlocks(Vec<Element>),
}

impl Element {
    pub fn text(s: impl Into<String>) -> Self {
        Element::Text(s.into())
    }

    /// Short variant name, used by outlines, logging and diff atom tagging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Text(_) => "Text",
            Element::InlineCode(_) => "InlineCode",
            Element::HtmlEntity(_) => "HtmlEntity",
            Element::EmojiRef { .. } => "EmojiRef",
            Element::LineBreak => "LineBreak",
            Element::AutoLink { .. } => "AutoLink",
            Element::FootnoteRef { .. } => "FootnoteRef",
            Element::ScriptPlaceholder { .. } => "ScriptPlaceholder",
            Element::ScriptError { .. } => "ScriptError",
            Element::HashTag(_) => "HashTag",
            Element::HtmlTag(_) => "HtmlTag",
            Element::Emphasis(_) => "Emphasis",
            Element::Strong(_) => "Strong",
            Element::Underline(_) => "Underline",
            Element::StrikeThrough(_) => "StrikeThrough",
            Element::SuperScript(_) => "SuperScript",
            Element::SubScript(_) => "SubScript",
            Element::Insert(_) => "Insert",
            Element::Delete(_) => "Delete",
            Element::Link { .. } => "Link",
            Element::Multimedia { .. } => "Multimedia",
            Element::Paragraph(_) => "Paragraph",
            Element::Header { .. } => "Header",
            Element::CodeBlock { .. } => "CodeBlock",
            Element::BlockQuote { .. } => "BlockQuote",
            Element::List { .. } => "List",
            Element::TaskList { .. } => "TaskList",
            Element::Table(_) => "Table",
            Element::DefinitionList { .. } => "DefinitionList",
            Element::Footnote { .. } => "Footnote",
            Element::Section { .. } => "Section",
            Element::SectionBreak { .. } => "SectionBreak",
            Element::HorizontalRule { .. } => "HorizontalRule",
            Element::CommentBlock(_) => "CommentBlock",
            Element::HtmlBlock(_) => "HtmlBlock",
            Element::InsertBlocks(_) => "InsertBlocks",
            Element::DeleteBlocks(_) => "DeleteBlocks",
        }
    }

    /// Whether the element lives at block scope. Block elements produced by the
    /// inline parser (nested lists, HTML blocks) are lifted out of paragraphs.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Element::Paragraph(_)
                | Element::Header { .. }
                | Element::CodeBlock { .. }
                | Element::BlockQuote { .. }
                | Element::List { .. }
                | Element::TaskList { .. }
                | Element::Table(_)
                | Element::DefinitionList { .. }
                | Element::Footnote { .. }
                | Element::Section { .. }
                | Element::SectionBreak { .. }
                | Element::HorizontalRule { .. }
                | Element::CommentBlock(_)
                | Element::HtmlBlock(_)
                | Element::InsertBlocks(_)
                | Element::DeleteBlocks(_)
        )
    }

    /// The single ordered child sequence of a composite, if it has one.
    ///
    /// Lists, tables and definition lists group their children in items or
    /// cells and return `None`; the diff engine pairs those up itself.
    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Element::Emphasis(c)
            | Element::Strong(c)
            | Element::Underline(c)
            | Element::StrikeThrough(c)
            | Element::SuperScript(c)
            | Element::SubScript(c)
            | Element::Insert(c)
            | Element::Delete(c)
            | Element::Paragraph(c)
            | Element::InsertBlocks(c)
            | Element::DeleteBlocks(c) => Some(c),
            Element::Link { children, .. }
            | Element::Multimedia { children, .. }
            | Element::Header { children, .. }
            | Element::BlockQuote { children, .. }
            | Element::Footnote { children, .. }
            | Element::Section { children, .. } => Some(children),
            _ => None,
        }
    }

    /// A copy of this composite carrying `children` instead of its own.
    /// Leaves are returned unchanged.
    pub fn with_children(&self, children: Vec<Element>) -> Element {
        match self {
            Element::Emphasis(_) => Element::Emphasis(children),
            Element::Strong(_) => Element::Strong(children),
            Element::Underline(_) => Element::Underline(children),
            Element::StrikeThrough(_) => Element::StrikeThrough(children),
            Element::SuperScript(_) => Element::SuperScript(children),
            Element::SubScript(_) => Element::SubScript(children),
            Element::Insert(_) => Element::Insert(children),
            Element::Delete(_) => Element::Delete(children),
            Element::Paragraph(_) => Element::Paragraph(children),
            Element::InsertBlocks(_) => Element::InsertBlocks(children),
            Element::DeleteBlocks(_) => Element::DeleteBlocks(children),
            Element::Link { target, .. } => Element::Link {
                target: target.clone(),
                children,
            },
            Element::Multimedia {
                sources, reference, ..
            } => Element::Multimedia {
                sources: sources.clone(),
                reference: reference.clone(),
                children,
            },
            Element::Header {
                level,
                is_prefix_style,
                ..
            } => Element::Header {
                level: *level,
                is_prefix_style: *is_prefix_style,
                children,
            },
            Element::BlockQuote { kind, .. } => Element::BlockQuote {
                kind: *kind,
                children,
            },
            Element::Footnote { key, .. } => Element::Footnote {
                key: key.clone(),
                children,
            },
            Element::Section {
                columns, separator, ..
            } => Element::Section {
                columns: *columns,
                separator: separator.clone(),
                children,
            },
            other => other.clone(),
        }
    }

    /// True when both elements are the same variant with the same attributes,
    /// ignoring children.
    pub fn same_metadata(&self, other: &Element) -> bool {
        match (self, other) {
            (Element::Link { target: a, .. }, Element::Link { target: b, .. }) => a == b,
            (
                Element::Multimedia {
                    sources: sa,
                    reference: ra,
                    ..
                },
                Element::Multimedia {
                    sources: sb,
                    reference: rb,
                    ..
                },
            ) => sa == sb && ra == rb,
            (
                Element::Header {
                    level: la,
                    is_prefix_style: pa,
                    ..
                },
                Element::Header {
                    level: lb,
                    is_prefix_style: pb,
                    ..
                },
            ) => la == lb && pa == pb,
            (Element::BlockQuote { kind: a, .. }, Element::BlockQuote { kind: b, .. }) => a == b,
            (Element::Footnote { key: a, .. }, Element::Footnote { key: b, .. }) => a == b,
            (
                Element::Section {
                    columns: ca,
                    separator: sa,
                    ..
                },
                Element::Section {
                    columns: cb,
                    separator: sb,
                    ..
                },
            ) => ca == cb && sa == sb,
            (a, b) if a.children().is_some() => a.kind_name() == b.kind_name(),
            (Element::Text(_), Element::Text(_)) => true,
            (Element::InlineCode(_), Element::InlineCode(_)) => true,
            (a, b) => a == b,
        }
    }

    /// The text of elements the diff engine may split into single characters.
    pub fn editable_text(&self) -> Option<&str> {
        match self {
            Element::Text(s) | Element::InlineCode(s) => Some(s),
            _ => None,
        }
    }

    /// Rebuilds an element of this element's kind from a run of its characters.
    pub fn assemble(&self, text: String) -> Element {
        match self {
            Element::Text(_) => Element::Text(text),
            Element::InlineCode(_) => Element::InlineCode(text),
            other => other.clone(),
        }
    }

    /// Whether adjacent siblings of this kind are folded into one element.
    pub fn merges_with(&self, previous: &Element) -> bool {
        match (previous, self) {
            (Element::List { kind: a, .. }, Element::List { kind: b, .. }) => a == b,
            (Element::TaskList { .. }, Element::TaskList { .. }) => true,
            (Element::BlockQuote { kind: a, .. }, Element::BlockQuote { kind: b, .. }) => a == b,
            (Element::InsertBlocks(_), Element::InsertBlocks(_)) => true,
            (Element::DeleteBlocks(_), Element::DeleteBlocks(_)) => true,
            (Element::DefinitionList { .. }, Element::DefinitionList { .. }) => true,
            _ => false,
        }
    }

    /// Moves this element's content onto the end of `previous`.
    /// Callers check [`Element::merges_with`] first.
    pub(crate) fn merge_into(self, previous: &mut Element) {
        match (previous, self) {
            (Element::List { items: a, .. }, Element::List { items: b, .. }) => a.extend(b),
            (Element::TaskList { items: a }, Element::TaskList { items: b }) => a.extend(b),
            (Element::DefinitionList { entries: a }, Element::DefinitionList { entries: b }) => {
                a.extend(b)
            }
            (Element::BlockQuote { children: a, .. }, Element::BlockQuote { children: b, .. })
            | (Element::InsertBlocks(a), Element::InsertBlocks(b))
            | (Element::DeleteBlocks(a), Element::DeleteBlocks(b)) => a.extend(b),
            _ => {}
        }
    }

    /// Plain text of this element and its descendants.
    pub fn to_plain_text(&self) -> String {
        crate::generate::element_plain_text(self)
    }
}

/// Appends `element` to `out`, folding it into the previous sibling when they merge.
pub(crate) fn push_merged(out: &mut Vec<Element>, element: Element) {
    if let Some(previous) = out.last_mut()
        && element.merges_with(previous)
    {
        element.merge_into(previous);
        return;
    }
    out.push(element);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_and_inlines_are_distinguished() {
        assert!(Element::Paragraph(vec![]).is_block());
        assert!(Element::HtmlBlock(String::new()).is_block());
        assert!(!Element::Strong(vec![]).is_block());
        assert!(!Element::text("x").is_block());
    }

    #[test]
    fn with_children_keeps_metadata() {
        let header = Element::Header {
            level: 2,
            is_prefix_style: true,
            children: vec![Element::text("old")],
        };
        let replaced = header.with_children(vec![Element::text("new")]);
        assert_eq!(
            replaced,
            Element::Header {
                level: 2,
                is_prefix_style: true,
                children: vec![Element::text("new")],
            }
        );
        assert!(header.same_metadata(&replaced));
    }

    #[test]
    fn same_metadata_compares_attributes_not_children() {
        let a = Element::Link {
            target: LinkTarget::Reference("x".into()),
            children: vec![Element::text("a")],
        };
        let b = Element::Link {
            target: LinkTarget::Reference("x".into()),
            children: vec![Element::text("b")],
        };
        let c = Element::Link {
            target: LinkTarget::Reference("y".into()),
            children: vec![Element::text("a")],
        };
        assert!(a.same_metadata(&b));
        assert!(!a.same_metadata(&c));
        assert!(!Element::Strong(vec![]).same_metadata(&Element::Emphasis(vec![])));
    }

    #[test]
    fn assemble_rebuilds_editable_elements() {
        assert_eq!(
            Element::InlineCode("a".into()).assemble("xyz".into()),
            Element::InlineCode("xyz".into())
        );
        assert_eq!(Element::LineBreak.assemble("ignored".into()), Element::LineBreak);
    }

    #[test]
    fn push_merged_folds_same_kind_lists() {
        let mut out = vec![Element::List {
            kind: ListKind::Bullet('-'),
            start: 1,
            items: vec![ListItem {
                value: None,
                children: vec![Element::text("a")],
            }],
        }];
        push_merged(
            &mut out,
            Element::List {
                kind: ListKind::Bullet('-'),
                start: 1,
                items: vec![ListItem {
                    value: None,
                    children: vec![Element::text("b")],
                }],
            },
        );
        push_merged(
            &mut out,
            Element::List {
                kind: ListKind::Bullet('*'),
                start: 1,
                items: vec![],
            },
        );
        assert_eq!(out.len(), 2);
        match &out[0] {
            Element::List { items, .. } => assert_eq!(items.len(), 2),
            other => panic!("expected list, got {other:?}"),
        }
    }
}
