//! # Capabilities
//!
//! Services the host injects into a parse. The parser calls them synchronously
//! and never assumes a particular implementation:
//!
//! - [`EmojiLookup`] resolves `:name:` shorthands and emoticons. Without one,
//!   every emoticon branch of the inline parser is disabled.
//! - [`ExpressionEvaluator`] evaluates `{{ ... }}` placeholders. Without one,
//!   braces are plain text.
//! - [`TransparentErrors`] lists evaluator error categories that must reach the
//!   caller instead of being rendered inline.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::BuildHasher;

use crate::model::Metadata;

pub trait EmojiLookup {
    /// Returns the emoji id for a shorthand such as `:smile:` or `:-)`.
    fn try_resolve(&self, shorthand: &str) -> Option<String>;
}

impl<S: BuildHasher> EmojiLookup for HashMap<String, String, S> {
    fn try_resolve(&self, shorthand: &str) -> Option<String> {
        self.get(shorthand).cloned()
    }
}

impl EmojiLookup for BTreeMap<String, String> {
    fn try_resolve(&self, shorthand: &str) -> Option<String> {
        self.get(shorthand).cloned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("{category}: {message}")]
    Failed { category: String, message: String },
    #[error("{} evaluation errors", .0.len())]
    Aggregate(Vec<EvalError>),
}

impl EvalError {
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Failed {
            category: category.into(),
            message: message.into(),
        }
    }

    /// The leaf errors, with nested aggregates unwrapped, as `(category, message)`.
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        match self {
            EvalError::Failed { category, message } => vec![(category.as_str(), message.as_str())],
            EvalError::Aggregate(inner) => inner.iter().flat_map(EvalError::leaves).collect(),
        }
    }
}

/// What an evaluator may see about the place an expression was found.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub metadata: &'a Metadata,
    /// Absolute byte offset of the opening `{{`.
    pub position: usize,
}

pub trait ExpressionEvaluator {
    /// Returns a denial message when `source` must not be evaluated.
    fn authorize(&self, _source: &str) -> Option<String> {
        None
    }

    fn evaluate(&self, source: &str, context: &EvalContext<'_>) -> Result<String, EvalError>;
}

/// Evaluator error categories that propagate to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransparentErrors(HashSet<String>);

impl TransparentErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: impl Into<String>) -> Self {
        self.0.insert(category.into());
        self
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains(category)
    }
}
