//! # Output Generation
//!
//! Depth-first traversal of a [`Document`] and the built-in generators.
//!
//! - **`walk`**: drives a [`Visitor`] over the body, then over every footnote
//!   referenced during that pass, in first-reference order
//! - **`plain`**: plain text
//! - **`markdown`**: Markdown regeneration in this dialect
//! - **`outline`**: an indented tree listing for inspection and snapshots
//!
//! Footnotes that were never referenced during the pass are not visited,
//! though they remain available from the document's footnote table.

pub mod markdown;
pub mod outline;
pub mod plain;

use std::collections::HashSet;

use crate::model::{Alignment, Document, Element};

pub use markdown::to_markdown;
pub use outline::outline;
pub use plain::PlainText;

/// A grouping level that is not itself an [`Element`]: list items, table
/// rows and cells, definition terms and descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    ListItem { index: usize, value: Option<u64> },
    TaskItem { checked: bool },
    TableRow { header: bool },
    TableCell { column: usize, alignment: Alignment, present: bool },
    Term,
    Description,
}

/// Callbacks for a depth-first traversal. All methods default to no-ops.
pub trait Visitor {
    fn enter(&mut self, _element: &Element, _depth: usize) {}
    fn leave(&mut self, _element: &Element, _depth: usize) {}

    fn enter_group(&mut self, _group: Group, _depth: usize) {}
    fn leave_group(&mut self, _group: Group, _depth: usize) {}
}

/// Walks the body of `document`, then its referenced footnotes.
pub fn walk(document: &Document, visitor: &mut impl Visitor) {
    let mut referenced = HashSet::new();
    for element in &document.elements {
        walk_tracking(element, visitor, 0, &mut referenced);
    }
    let mut emitted = HashSet::new();
    loop {
        let pending = pending_footnotes(document, &referenced, &mut emitted);
        if pending.is_empty() {
            break;
        }
        for footnote in pending {
            walk_tracking(footnote, visitor, 0, &mut referenced);
        }
    }
}

/// Walks a single element and its descendants.
pub fn walk_element(element: &Element, visitor: &mut impl Visitor, depth: usize) {
    walk_tracking(element, visitor, depth, &mut HashSet::new());
}

/// Footnotes referenced so far but not yet emitted, in first-reference order.
/// Marks the returned keys as emitted.
pub(crate) fn pending_footnotes<'d>(
    document: &'d Document,
    referenced: &HashSet<String>,
    emitted: &mut HashSet<String>,
) -> Vec<&'d Element> {
    document
        .footnotes
        .order()
        .iter()
        .filter(|key| referenced.contains(*key) && emitted.insert((*key).clone()))
        .filter_map(|key| document.footnotes.get(key))
        .collect()
}

fn walk_tracking(element: &Element, visitor: &mut impl Visitor, depth: usize, referenced: &mut HashSet<String>) {
    if let Element::FootnoteRef { key } = element {
        referenced.insert(key.clone());
    }
    visitor.enter(element, depth);
    let inner = depth + 1;
    let mut children = |elements: &[Element], visitor: &mut _| {
        for child in elements {
            walk_tracking(child, visitor, inner, referenced);
        }
    };

    match element {
        Element::List { items, .. } => {
            for (index, item) in items.iter().enumerate() {
                let group = Group::ListItem {
                    index,
                    value: item.value,
                };
                visitor.enter_group(group, inner);
                children(&item.children, visitor);
                visitor.leave_group(group, inner);
            }
        }
        Element::TaskList { items } => {
            for item in items {
                let group = Group::TaskItem { checked: item.checked };
                visitor.enter_group(group, inner);
                children(&item.children, visitor);
                visitor.leave_group(group, inner);
            }
        }
        Element::Table(table) => {
            let rows = std::iter::once((true, &table.headers)).chain(table.rows.iter().map(|r| (false, r)));
            for (header, row) in rows {
                let row_group = Group::TableRow { header };
                visitor.enter_group(row_group, inner);
                for (column, cell) in row.iter().enumerate() {
                    let group = Group::TableCell {
                        column,
                        alignment: table
                            .column_alignment
                            .get(column)
                            .copied()
                            .unwrap_or(Alignment::Default),
                        present: cell.content.is_some(),
                    };
                    visitor.enter_group(group, inner);
                    children(cell.content.as_deref().unwrap_or(&[]), visitor);
                    visitor.leave_group(group, inner);
                }
                visitor.leave_group(row_group, inner);
            }
        }
        Element::DefinitionList { entries } => {
            for entry in entries {
                for term in &entry.terms {
                    visitor.enter_group(Group::Term, inner);
                    children(term, visitor);
                    visitor.leave_group(Group::Term, inner);
                }
                for description in &entry.descriptions {
                    visitor.enter_group(Group::Description, inner);
                    children(description, visitor);
                    visitor.leave_group(Group::Description, inner);
                }
            }
        }
        other => {
            if let Some(kids) = other.children() {
                children(kids, visitor);
            }
        }
    }
    visitor.leave(element, depth);
}

/// Plain text of a single element.
pub fn element_plain_text(element: &Element) -> String {
    let mut plain = PlainText::default();
    walk_element(element, &mut plain, 0);
    plain.finish()
}

/// Plain text of a whole document, including referenced footnotes.
pub fn to_plain_text(document: &Document) -> String {
    let mut plain = PlainText::default();
    walk(document, &mut plain);
    plain.finish()
}
