//! # Document Diff
//!
//! Structural difference between two parsed documents.
//!
//! ## Pipeline
//!
//! 1. **Atomize** (`atom`): editable text becomes one [`Symbol`] per
//!    character; every other element is one symbol compared by value
//! 2. **Edit script** (`script`): Myers over the symbol sequences, coalesced
//!    into Keep/Insert/Delete steps
//! 3. **Reassemble**: runs of atoms are joined back into elements of their
//!    source kind
//! 4. **Recurse**: a Delete immediately followed by an Insert of the same
//!    length, pairing elements of the same shape, is diffed child by child
//!    instead of being replaced wholesale. Lists, task lists, tables and
//!    definition lists pair up item by item (cell by cell) when their kind
//!    and counts agree
//! 5. **Wrap**: remaining inserted and deleted runs are wrapped in
//!    `Insert`/`Delete` (inline) or `InsertBlocks`/`DeleteBlocks` (block)

mod atom;
mod script;

use crate::error::{EngineError, Result};
use crate::model::{DefinitionEntry, Document, Element, ListItem, Table, TableCell, TaskItem};

use atom::{Symbol, atomize, reassemble};
use script::{Op, Step, edit_script};

/// Diffs `old` against `new`.
///
/// With `keep_unchanged` the result is the whole new document with changes
/// marked; without it only changed runs (and the composites leading to them)
/// are kept. Side tables are taken from `new`; footnotes defined in both are
/// diffed as well.
pub fn diff(old: &Document, new: &Document, keep_unchanged: bool) -> Result<Document> {
    if old.is_sectioned() != new.is_sectioned() {
        return Err(EngineError::IncompatibleRoots {
            old: root_shape(old),
            new: root_shape(new),
        });
    }

    let elements = match (old.elements.as_slice(), new.elements.as_slice()) {
        (
            [old_section @ Element::Section { .. }],
            [new_section @ Element::Section { .. }],
        ) => {
            let children = diff_elements(
                old_section.children().unwrap_or_default(),
                new_section.children().unwrap_or_default(),
                keep_unchanged,
            );
            vec![new_section.with_children(children)]
        }
        (old_elements, new_elements) => diff_elements(old_elements, new_elements, keep_unchanged),
    };

    let mut footnotes = new.footnotes.clone();
    for key in new.footnotes.order() {
        if let (Some(Element::Footnote { children: a, .. }), Some(Element::Footnote { children: b, .. })) =
            (old.footnotes.get(key), new.footnotes.get(key))
        {
            footnotes.define(key, diff_elements(a, b, keep_unchanged));
        }
    }

    Ok(Document {
        elements,
        references: new.references.clone(),
        footnotes,
        metadata: new.metadata.clone(),
        tag: None,
    })
}

fn root_shape(document: &Document) -> &'static str {
    if document.is_sectioned() {
        "sectioned"
    } else {
        "flat"
    }
}

/// Diffs two sibling sequences.
pub fn diff_elements(old: &[Element], new: &[Element], keep_unchanged: bool) -> Vec<Element> {
    let a = atomize(old);
    let b = atomize(new);
    let steps = edit_script(&a, &b);
    log::trace!(
        "{} old and {} new symbols in {} step(s)",
        a.len(),
        b.len(),
        steps.len()
    );

    let mut out = Vec::new();
    let mut i = 0;
    while i < steps.len() {
        let step = &steps[i];
        if step.op == Op::Delete
            && let Some(next) = steps.get(i + 1)
            && let Some(paired) = recurse_pairs(step, next, keep_unchanged)
        {
            out.extend(paired);
            i += 2;
            continue;
        }

        match step.op {
            Op::Keep if keep_unchanged => out.extend(reassemble_step(step)),
            Op::Keep => {}
            Op::Insert => wrap_runs(reassemble_step(step), Element::InsertBlocks, Element::Insert, &mut out),
            Op::Delete => {
                if let Some(Symbol::Atom { offset, .. }) = step.symbols.first().copied() {
                    log::trace!("deleting {} atom(s) from offset {offset}", step.symbols.len());
                }
                wrap_runs(reassemble_step(step), Element::DeleteBlocks, Element::Delete, &mut out)
            }
        }
        i += 1;
    }
    out
}

/// Diffs a Delete step against the Insert that follows it position by
/// position, when both hold the same number of elements and every pair has
/// the same shape.
fn recurse_pairs(deleted: &Step<'_, '_>, inserted: &Step<'_, '_>, keep_unchanged: bool) -> Option<Vec<Element>> {
    if inserted.op != Op::Insert || deleted.symbols.len() != inserted.symbols.len() {
        return None;
    }
    deleted
        .symbols
        .iter()
        .zip(&inserted.symbols)
        .map(|(a, b)| diff_pair(a.whole()?, b.whole()?, keep_unchanged))
        .collect()
}

/// The diff of two elements that line up, or `None` when their shapes differ
/// and one has to replace the other.
fn diff_pair(old: &Element, new: &Element, keep_unchanged: bool) -> Option<Element> {
    match (old, new) {
        (
            Element::List {
                kind: old_kind,
                start: old_start,
                items: old_items,
            },
            Element::List { kind, start, items },
        ) => {
            if old_kind != kind || old_start != start || old_items.len() != items.len() {
                return None;
            }
            let items = old_items
                .iter()
                .zip(items)
                .map(|(a, b)| ListItem {
                    value: b.value,
                    children: diff_elements(&a.children, &b.children, keep_unchanged),
                })
                .collect();
            Some(Element::List {
                kind: *kind,
                start: *start,
                items,
            })
        }
        (Element::TaskList { items: old_items }, Element::TaskList { items }) => {
            if old_items.len() != items.len() || old_items.iter().zip(items).any(|(a, b)| a.checked != b.checked) {
                return None;
            }
            let items = old_items
                .iter()
                .zip(items)
                .map(|(a, b)| TaskItem {
                    checked: b.checked,
                    children: diff_elements(&a.children, &b.children, keep_unchanged),
                })
                .collect();
            Some(Element::TaskList { items })
        }
        (Element::Table(a), Element::Table(b)) => {
            if a.column_count() != b.column_count() || a.rows.len() != b.rows.len() {
                return None;
            }
            let headers = diff_cells(&a.headers, &b.headers, keep_unchanged)?;
            let rows = a
                .rows
                .iter()
                .zip(&b.rows)
                .map(|(x, y)| diff_cells(x, y, keep_unchanged))
                .collect::<Option<Vec<_>>>()?;
            Some(Element::Table(Table {
                headers,
                rows,
                column_alignment: b.column_alignment.clone(),
                caption: b.caption.clone(),
                id: b.id.clone(),
            }))
        }
        (Element::DefinitionList { entries: old_entries }, Element::DefinitionList { entries }) => {
            let same_shape = old_entries.len() == entries.len()
                && old_entries
                    .iter()
                    .zip(entries)
                    .all(|(a, b)| a.terms.len() == b.terms.len() && a.descriptions.len() == b.descriptions.len());
            if !same_shape {
                return None;
            }
            let entries = old_entries
                .iter()
                .zip(entries)
                .map(|(a, b)| DefinitionEntry {
                    terms: diff_groups(&a.terms, &b.terms, keep_unchanged),
                    descriptions: diff_groups(&a.descriptions, &b.descriptions, keep_unchanged),
                })
                .collect();
            Some(Element::DefinitionList { entries })
        }
        _ => {
            let (a, b) = (old.children()?, new.children()?);
            old.same_metadata(new)
                .then(|| new.with_children(diff_elements(a, b, keep_unchanged)))
        }
    }
}

fn diff_groups(old: &[Vec<Element>], new: &[Vec<Element>], keep_unchanged: bool) -> Vec<Vec<Element>> {
    old.iter()
        .zip(new)
        .map(|(a, b)| diff_elements(a, b, keep_unchanged))
        .collect()
}

/// Cells pair up when both are present or both are absent.
fn diff_cells(old: &[TableCell], new: &[TableCell], keep_unchanged: bool) -> Option<Vec<TableCell>> {
    if old.len() != new.len() {
        return None;
    }
    old.iter()
        .zip(new)
        .map(|(a, b)| match (&a.content, &b.content) {
            (Some(x), Some(y)) => Some(TableCell {
                content: Some(diff_elements(x, y, keep_unchanged)),
                auto_expand: b.auto_expand,
            }),
            (None, None) => Some(b.clone()),
            _ => None,
        })
        .collect()
}

fn reassemble_step(step: &Step<'_, '_>) -> Vec<Element> {
    let symbols: Vec<Symbol<'_>> = step.symbols.iter().map(|s| **s).collect();
    reassemble(&symbols)
}

/// Wraps consecutive block elements with `blocks` and inline ones with `inline`.
fn wrap_runs(
    elements: Vec<Element>,
    blocks: fn(Vec<Element>) -> Element,
    inline: fn(Vec<Element>) -> Element,
    out: &mut Vec<Element>,
) {
    let mut run: Vec<Element> = Vec::new();
    let mut run_is_block = false;
    for element in elements {
        let is_block = element.is_block();
        if !run.is_empty() && is_block != run_is_block {
            let wrap = if run_is_block { blocks } else { inline };
            out.push(wrap(std::mem::take(&mut run)));
        }
        run_is_block = is_block;
        run.push(element);
    }
    if !run.is_empty() {
        let wrap = if run_is_block { blocks } else { inline };
        out.push(wrap(run));
    }
}
