use serde::{Deserialize, Serialize};

use crate::capabilities::{EmojiLookup, ExpressionEvaluator, TransparentErrors};

/// Metadata flag a page sets to let its own `<script>` tags through.
pub const ALLOW_SCRIPT_TAGS_KEY: &str = "ALLOWSCRIPTTAGS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Caller-side half of the script-tag permission; the page must agree via
    /// [`ALLOW_SCRIPT_TAGS_KEY`].
    pub allow_script_tags: bool,
}

/// Everything a parse borrows from its host: options and injected capabilities.
#[derive(Default)]
pub struct ParseContext<'a> {
    pub options: ParseOptions,
    pub emoji: Option<&'a dyn EmojiLookup>,
    pub evaluator: Option<&'a dyn ExpressionEvaluator>,
    pub transparent: TransparentErrors,
}

impl<'a> ParseContext<'a> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn with_emoji(mut self, lookup: &'a dyn EmojiLookup) -> Self {
        self.emoji = Some(lookup);
        self
    }

    pub fn with_evaluator(mut self, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_transparent(mut self, transparent: TransparentErrors) -> Self {
        self.transparent = transparent;
        self
    }
}
