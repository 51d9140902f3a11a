use std::collections::HashMap;

use similar::{Algorithm, DiffOp, capture_diff_slices};

use super::atom::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Keep,
    Insert,
    Delete,
}

/// A maximal run of symbols sharing one operation. `Keep` and `Insert`
/// carry symbols from the new sequence, `Delete` from the old one.
#[derive(Debug, Clone)]
pub(crate) struct Step<'s, 'e> {
    pub op: Op,
    pub symbols: Vec<&'s Symbol<'e>>,
}

/// Runs Myers over the two symbol sequences and coalesces the result into
/// alternating steps.
pub(crate) fn edit_script<'s, 'e>(old: &'s [Symbol<'e>], new: &'s [Symbol<'e>]) -> Vec<Step<'s, 'e>> {
    let (old_ids, new_ids) = intern(old, new);
    let mut steps: Vec<Step<'s, 'e>> = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &old_ids, &new_ids) {
        match op {
            DiffOp::Equal { new_index, len, .. } => push(&mut steps, Op::Keep, &new[new_index..new_index + len]),
            DiffOp::Delete {
                old_index, old_len, ..
            } => push(&mut steps, Op::Delete, &old[old_index..old_index + old_len]),
            DiffOp::Insert {
                new_index, new_len, ..
            } => push(&mut steps, Op::Insert, &new[new_index..new_index + new_len]),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                push(&mut steps, Op::Delete, &old[old_index..old_index + old_len]);
                push(&mut steps, Op::Insert, &new[new_index..new_index + new_len]);
            }
        }
    }
    steps
}

/// Maps equal symbols to equal ids so the diff runs over plain `usize`s.
fn intern<'s, 'e>(old: &'s [Symbol<'e>], new: &'s [Symbol<'e>]) -> (Vec<usize>, Vec<usize>) {
    let mut ids: HashMap<&'s Symbol<'e>, usize> = HashMap::new();
    let mut id_of = |symbol: &'s Symbol<'e>| {
        let next = ids.len();
        *ids.entry(symbol).or_insert(next)
    };
    let old_ids = old.iter().map(&mut id_of).collect();
    let new_ids = new.iter().map(&mut id_of).collect();
    (old_ids, new_ids)
}

fn push<'s, 'e>(steps: &mut Vec<Step<'s, 'e>>, op: Op, symbols: &'s [Symbol<'e>]) {
    if symbols.is_empty() {
        return;
    }
    match steps.last_mut() {
        Some(last) if last.op == op => last.symbols.extend(symbols),
        _ => steps.push(Step {
            op,
            symbols: symbols.iter().collect(),
        }),
    }
}
