use std::fmt::Write;

use crate::model::{Document, Element, LinkTarget, ListKind};

use super::{Group, Visitor, walk, walk_element};

/// Indented tree listing, one node per line.
#[derive(Debug, Default)]
pub struct Outline {
    out: String,
    groups: usize,
}

impl Outline {
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{}{}", "  ".repeat(depth + self.groups), text);
    }
}

impl Visitor for Outline {
    fn enter(&mut self, element: &Element, depth: usize) {
        self.line(depth, &describe(element));
    }

    fn enter_group(&mut self, group: Group, depth: usize) {
        let label = match group {
            Group::ListItem { value: Some(n), .. } => format!("Item {n}"),
            Group::ListItem { .. } => "Item".to_string(),
            Group::TaskItem { checked: true } => "Task [x]".to_string(),
            Group::TaskItem { checked: false } => "Task [ ]".to_string(),
            Group::TableRow { header: true } => "HeaderRow".to_string(),
            Group::TableRow { header: false } => "Row".to_string(),
            Group::TableCell { present: false, .. } => "Cell (none)".to_string(),
            Group::TableCell { .. } => "Cell".to_string(),
            Group::Term => "Term".to_string(),
            Group::Description => "Description".to_string(),
        };
        self.line(depth, &label);
        self.groups += 1;
    }

    fn leave_group(&mut self, _group: Group, _depth: usize) {
        self.groups -= 1;
    }
}

/// Outline of the body and its referenced footnotes.
pub fn outline(document: &Document) -> String {
    let mut out = Outline::default();
    walk(document, &mut out);
    out.finish()
}

/// Outline of a single subtree.
pub fn outline_element(element: &Element) -> String {
    let mut out = Outline::default();
    walk_element(element, &mut out, 0);
    out.finish()
}

/// One-line description of a node, without its children.
pub fn describe(element: &Element) -> String {
    let name = element.kind_name();
    match element {
        Element::Text(s)
        | Element::InlineCode(s)
        | Element::HtmlTag(s)
        | Element::CommentBlock(s)
        | Element::HtmlBlock(s) => format!("{name} {s:?}"),
        Element::HtmlEntity(body) => format!("{name} &{body};"),
        Element::HashTag(tag) => format!("{name} #{tag}"),
        Element::EmojiRef { shorthand, id } => format!("{name} {shorthand} -> {id}"),
        Element::AutoLink { url, is_mail: true } => format!("{name} mailto {url}"),
        Element::AutoLink { url, .. } => format!("{name} {url}"),
        Element::FootnoteRef { key } | Element::Footnote { key, .. } => format!("{name} {key}"),
        Element::ScriptPlaceholder { source, value } => format!("{name} {source:?} = {value:?}"),
        Element::ScriptError { source, message } => format!("{name} {source:?}: {message}"),
        Element::Link {
            target: LinkTarget::Inline { url, title },
            ..
        } => match title {
            Some(title) => format!("{name} {url} {title:?}"),
            None => format!("{name} {url}"),
        },
        Element::Link {
            target: LinkTarget::Reference(label),
            ..
        } => format!("{name} [{label}]"),
        Element::Multimedia {
            reference: Some(label),
            ..
        } => format!("{name} [{label}]"),
        Element::Multimedia { sources, .. } => {
            let urls: Vec<&str> = sources.iter().map(|s| s.url.as_str()).collect();
            format!("{name} {}", urls.join(", "))
        }
        Element::Header {
            level,
            is_prefix_style,
            ..
        } => {
            if *is_prefix_style {
                format!("{name} {level}")
            } else {
                format!("{name} {level} (setext)")
            }
        }
        Element::CodeBlock { language, text } => match language {
            Some(lang) => format!("{name} {lang} {text:?}"),
            None => format!("{name} {text:?}"),
        },
        Element::BlockQuote { kind, .. } => format!("{name} {kind:?}"),
        Element::List { kind, start, .. } => match kind {
            ListKind::Bullet(c) => format!("{name} bullet {c:?}"),
            ListKind::Ordered => format!("{name} ordered start={start}"),
            ListKind::Hash => format!("{name} hash start={start}"),
        },
        Element::Table(table) => {
            let mut s = format!("{name} columns={}", table.column_count());
            if let Some(caption) = &table.caption {
                let _ = write!(s, " caption={caption:?}");
            }
            if let Some(id) = &table.id {
                let _ = write!(s, " id={id:?}");
            }
            s
        }
        Element::Section { columns, separator, .. } | Element::SectionBreak { columns, separator } => {
            format!("{name} columns={columns} {separator:?}")
        }
        Element::HorizontalRule { invisible: true } => format!("{name} invisible"),
        _ => name.to_string(),
    }
}
