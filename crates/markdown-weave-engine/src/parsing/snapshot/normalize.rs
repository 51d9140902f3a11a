use serde::Serialize;

use crate::generate::outline::outline_element;
use crate::model::Document;

#[derive(Debug, Serialize)]
pub struct Snap {
    /// One line per node, indented by depth.
    pub outline: Vec<String>,
    /// `label -> url` in label order.
    pub references: Vec<String>,
    /// Each defined footnote in first-reference order, then unreferenced ones by key.
    pub footnotes: Vec<FootnoteSnap>,
}

#[derive(Debug, Serialize)]
pub struct FootnoteSnap {
    pub key: String,
    pub referenced: bool,
    pub outline: Vec<String>,
}

pub fn normalize(document: &Document) -> Snap {
    let outline = document
        .elements
        .iter()
        .flat_map(|e| lines(&outline_element(e)))
        .collect();

    let references = document
        .references
        .iter()
        .map(|(label, source)| format!("{label} -> {}", source.url))
        .collect();

    let order = document.footnotes.order();
    let mut keys: Vec<(String, bool)> = order.iter().map(|k| (k.clone(), true)).collect();
    let mut unreferenced: Vec<String> = document
        .footnotes
        .keys()
        .filter(|k| !order.contains(*k))
        .cloned()
        .collect();
    unreferenced.sort();
    keys.extend(unreferenced.into_iter().map(|k| (k, false)));

    let footnotes = keys
        .into_iter()
        .filter_map(|(key, referenced)| {
            let footnote = document.footnotes.get(&key)?;
            let outline = footnote
                .children()
                .unwrap_or_default()
                .iter()
                .flat_map(|e| lines(&outline_element(e)))
                .collect();
            Some(FootnoteSnap {
                key,
                referenced,
                outline,
            })
        })
        .collect();

    Snap {
        outline,
        references,
        footnotes,
    }
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
