use crate::model::Element;
use crate::parsing::inline::kinds::Entity;

use super::{Group, Visitor};

/// Collects the readable text of a tree: markup is dropped, entities are
/// decoded, blocks are separated by blank lines and table cells by tabs.
#[derive(Debug, Default)]
pub struct PlainText {
    out: String,
}

impl PlainText {
    pub fn finish(self) -> String {
        self.out.trim_end().to_string()
    }

    fn separate(&mut self, separator: &str) {
        let trimmed = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(trimmed);
        if self.out.is_empty() {
            return;
        }
        let newlines = self.out.len() - self.out.trim_end_matches('\n').len();
        let wanted = separator.len();
        if newlines < wanted {
            self.out.push_str(&separator[newlines..]);
        }
    }
}

impl Visitor for PlainText {
    fn enter(&mut self, element: &Element, _depth: usize) {
        if element.is_block() {
            self.separate("\n\n");
        }
        match element {
            Element::Text(s) | Element::InlineCode(s) | Element::CodeBlock { text: s, .. } => {
                self.out.push_str(s)
            }
            Element::HtmlEntity(body) => self.out.push_str(&Entity::decode(body)),
            Element::EmojiRef { shorthand, .. } => self.out.push_str(shorthand),
            Element::LineBreak => self.out.push('\n'),
            Element::AutoLink { url, .. } => self.out.push_str(url),
            Element::FootnoteRef { key } => {
                self.out.push_str("[^");
                self.out.push_str(key);
                self.out.push(']');
            }
            Element::ScriptPlaceholder { value, .. } => self.out.push_str(value),
            Element::ScriptError { message, .. } => {
                self.out.push('[');
                self.out.push_str(message);
                self.out.push(']');
            }
            Element::HashTag(tag) => {
                self.out.push('#');
                self.out.push_str(tag);
            }
            Element::Footnote { key, .. } => {
                self.out.push_str("[^");
                self.out.push_str(key);
                self.out.push_str("] ");
            }
            _ => {}
        }
    }

    fn enter_group(&mut self, group: Group, _depth: usize) {
        match group {
            Group::ListItem { .. } | Group::TaskItem { .. } | Group::TableRow { .. } | Group::Term => {
                self.separate("\n")
            }
            Group::TableCell { column, .. } if column > 0 => self.out.push('\t'),
            Group::Description => {
                self.separate("\n");
                self.out.push_str("    ");
            }
            Group::TableCell { .. } => {}
        }
    }
}
