use crate::model::{Document, Element};

/// Validates structural invariants of a parsed document.
///
/// Asserts that:
/// - Every table row, header row included, has exactly one cell per column
/// - No two adjacent siblings are left that should have been folded together
/// - `Footnote` elements only live in the footnote table
/// - A `Section` only appears as the sole root element
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(document: &Document) {
    if !document.is_sectioned() {
        for element in &document.elements {
            assert!(
                !matches!(element, Element::Section { .. }),
                "section mixed with other root elements"
            );
        }
    }
    siblings(&document.elements, 0);
}

fn siblings(elements: &[Element], depth: usize) {
    for pair in elements.windows(2) {
        assert!(
            !pair[1].merges_with(&pair[0]),
            "adjacent {} siblings were not merged",
            pair[1].kind_name()
        );
    }
    for element in elements {
        node(element, depth);
    }
}

fn node(element: &Element, depth: usize) {
    match element {
        Element::Footnote { key, .. } => panic!("footnote [^{key}] embedded in the tree"),
        Element::Section { .. } => assert_eq!(depth, 0, "nested section"),
        Element::Table(table) => {
            let columns = table.column_count();
            assert_eq!(table.headers.len(), columns, "header row width");
            for (i, row) in table.rows.iter().enumerate() {
                assert_eq!(row.len(), columns, "row {i} width");
            }
            for cell in table.headers.iter().chain(table.rows.iter().flatten()) {
                if let Some(content) = &cell.content {
                    siblings(content, depth + 1);
                }
            }
        }
        Element::List { items, .. } => {
            for item in items {
                siblings(&item.children, depth + 1);
            }
        }
        Element::TaskList { items } => {
            for item in items {
                siblings(&item.children, depth + 1);
            }
        }
        Element::DefinitionList { entries } => {
            for part in entries.iter().flat_map(|e| e.terms.iter().chain(&e.descriptions)) {
                siblings(part, depth + 1);
            }
        }
        other => {
            if let Some(children) = other.children() {
                siblings(children, depth + 1);
            }
        }
    }
}
