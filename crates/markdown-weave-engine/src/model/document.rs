use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;

use super::element::{Element, MediaSource};

/// Reference-link definitions keyed by label.
///
/// Labels are case-insensitive; defining a label twice keeps the last definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct References {
    map: BTreeMap<String, MediaSource>,
}

impl References {
    pub fn insert(&mut self, label: &str, definition: MediaSource) {
        self.map.insert(label.to_lowercase(), definition);
    }

    pub fn get(&self, label: &str) -> Option<&MediaSource> {
        self.map.get(&label.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Definitions in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MediaSource)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Footnote definitions plus the order in which keys were first referenced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Footnotes {
    definitions: HashMap<String, Element>,
    order: Vec<String>,
    generated: usize,
}

impl Footnotes {
    /// Stores a definition. A later definition of the same key replaces the earlier one.
    pub fn define(&mut self, key: &str, children: Vec<Element>) {
        self.definitions.insert(
            key.to_string(),
            Element::Footnote {
                key: key.to_string(),
                children,
            },
        );
    }

    /// Records a reference, remembering the key's position on first sight.
    pub fn reference(&mut self, key: &str) {
        if !self.order.iter().any(|k| k == key) {
            self.order.push(key.to_string());
        }
    }

    /// A fresh key for a footnote written inline (`^[...]`), which has none of its own.
    pub fn generate_key(&mut self) -> String {
        loop {
            self.generated += 1;
            let key = format!("_inline_{}", self.generated);
            if !self.definitions.contains_key(&key) {
                return key;
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.definitions.get(key)
    }

    /// Keys in first-reference order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Every defined key, referenced or not, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.definitions.keys()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataValue {
    pub value: String,
    /// Whether the source line ended in a hard break.
    pub hard_break: bool,
}

/// Page metadata supplied by the host. Keys are upper-cased; repeated keys
/// accumulate values instead of replacing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    entries: BTreeMap<String, Vec<MetadataValue>>,
}

impl Metadata {
    pub fn insert(&mut self, key: &str, value: impl Into<String>, hard_break: bool) {
        self.entries
            .entry(key.to_uppercase())
            .or_default()
            .push(MetadataValue {
                value: value.into(),
                hard_break,
            });
    }

    pub fn get(&self, key: &str) -> &[MetadataValue] {
        self.entries
            .get(&key.to_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).first().map(|v| v.value.as_str())
    }

    /// True when the first value of `key` reads as an affirmative flag.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.first(key).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A parsed document: the element tree and its side tables.
///
/// Built once by the parser and read afterwards. `tag` is the one slot a
/// caller may set for its own bookkeeping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub elements: Vec<Element>,
    pub references: References,
    pub footnotes: Footnotes,
    pub metadata: Metadata,
    #[serde(skip)]
    pub tag: Option<Arc<dyn Any + Send + Sync>>,
}

impl Document {
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    /// Whether the whole body is wrapped in a single [`Element::Section`].
    pub fn is_sectioned(&self) -> bool {
        matches!(self.elements.as_slice(), [Element::Section { .. }])
    }
}
