use std::hash::{Hash, Hasher};

use crate::model::Element;

/// One diffable unit: a single character of an editable element, or a whole
/// element compared by value.
///
/// Equality and hashing look only at the comparison key (the character and
/// the kind of its source, or the element itself); `source` and `offset`
/// ride along so the run can be reassembled.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Symbol<'e> {
    Atom {
        ch: char,
        kind: &'static str,
        source: &'e Element,
        offset: usize,
    },
    Whole(&'e Element),
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Symbol::Atom { ch: a, kind: ka, .. }, Symbol::Atom { ch: b, kind: kb, .. }) => a == b && ka == kb,
            (Symbol::Whole(a), Symbol::Whole(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Symbol::Atom { ch, kind, .. } => {
                0u8.hash(state);
                ch.hash(state);
                kind.hash(state);
            }
            Symbol::Whole(element) => {
                1u8.hash(state);
                element.hash(state);
            }
        }
    }
}

impl<'e> Symbol<'e> {
    /// The element a non-text symbol stands for.
    pub(crate) fn whole(&self) -> Option<&'e Element> {
        match self {
            Symbol::Whole(element) => Some(*element),
            Symbol::Atom { .. } => None,
        }
    }
}

/// Explodes editable text into per-character atoms; everything else stays whole.
pub(crate) fn atomize(elements: &[Element]) -> Vec<Symbol<'_>> {
    let mut symbols = Vec::new();
    for element in elements {
        match element.editable_text() {
            Some(text) => symbols.extend(text.chars().enumerate().map(|(offset, ch)| Symbol::Atom {
                ch,
                kind: element.kind_name(),
                source: element,
                offset,
            })),
            None => symbols.push(Symbol::Whole(element)),
        }
    }
    symbols
}

/// Rebuilds elements from a run of symbols. Adjacent atoms of the same kind
/// are joined into one element of that kind.
pub(crate) fn reassemble(symbols: &[Symbol<'_>]) -> Vec<Element> {
    let mut out = Vec::new();
    let mut run: Option<(&Element, String)> = None;
    for symbol in symbols {
        match *symbol {
            Symbol::Atom { ch, kind, source, .. } => {
                if let Some((first, text)) = &mut run
                    && first.kind_name() == kind
                {
                    text.push(ch);
                    continue;
                }
                if let Some((first, text)) = run.take() {
                    out.push(first.assemble(text));
                }
                run = Some((source, ch.to_string()));
            }
            Symbol::Whole(element) => {
                if let Some((first, text)) = run.take() {
                    out.push(first.assemble(text));
                }
                out.push(element.clone());
            }
        }
    }
    if let Some((first, text)) = run {
        out.push(first.assemble(text));
    }
    out
}
