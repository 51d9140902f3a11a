//! Markdown regeneration.
//!
//! Output is canonical: parsing it again and regenerating yields the same
//! text. Literal text is escaped wherever it could otherwise be read as markup.

use std::collections::HashSet;

use crate::model::{
    Alignment, DefinitionEntry, Document, Element, LinkTarget, ListItem, ListKind, MediaSource, Table,
    TableCell, TaskItem,
};
use crate::parsing::blocks::kinds::{BlockQuote, CodeFence, Comment, QuoteMarker};
use crate::parsing::inline::kinds::Link;

use super::pending_footnotes;

const INDENT: &str = "    ";

/// Regenerates Markdown for the body, the reference definitions and every
/// footnote referenced from the output.
pub fn to_markdown(document: &Document) -> String {
    let mut writer = MarkdownWriter::default();
    let mut sections = Vec::new();

    let body = writer.blocks(&document.elements);
    if !body.is_empty() {
        sections.push(body);
    }

    let references: Vec<String> = document
        .references
        .iter()
        .map(|(label, source)| format!("[{label}]: {}", Link::format_target(source)))
        .collect();
    if !references.is_empty() {
        sections.push(references.join("\n"));
    }

    let mut emitted = HashSet::new();
    loop {
        let pending = pending_footnotes(document, &writer.referenced, &mut emitted);
        if pending.is_empty() {
            break;
        }
        for footnote in pending {
            if let Element::Footnote { key, children } = footnote {
                let body = writer.blocks(children);
                sections.push(attach_body(&format!("[^{key}]:"), &body));
            }
        }
    }

    let mut out = sections.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

#[derive(Default)]
struct MarkdownWriter {
    referenced: HashSet<String>,
}

impl MarkdownWriter {
    fn blocks(&mut self, elements: &[Element]) -> String {
        let mut parts = Vec::with_capacity(elements.len());
        let mut inline_run: Vec<&Element> = Vec::new();
        for element in elements {
            if element.is_block() {
                if !inline_run.is_empty() {
                    parts.push(self.inline_refs(&inline_run));
                    inline_run.clear();
                }
                parts.push(self.block(element));
            } else {
                inline_run.push(element);
            }
        }
        if !inline_run.is_empty() {
            parts.push(self.inline_refs(&inline_run));
        }
        parts.join("\n\n")
    }

    fn block(&mut self, element: &Element) -> String {
        match element {
            Element::Paragraph(children) => self.inline(children),
            Element::Header {
                level,
                is_prefix_style: true,
                children,
            } => {
                let hashes = "#".repeat(usize::from(*level));
                let text = self.inline(children);
                if text.is_empty() {
                    hashes
                } else {
                    format!("{hashes} {text}")
                }
            }
            Element::Header { level, children, .. } => {
                let underline = if *level == 1 { "===" } else { "---" };
                format!("{}\n{underline}", self.inline(children))
            }
            Element::CodeBlock { language, text } => code_fence(language.as_deref(), text),
            Element::BlockQuote { kind, children } => {
                let body = self.blocks(children);
                prefix_lines(BlockQuote::prefix(QuoteMarker::Quote(*kind)), &body)
            }
            Element::InsertBlocks(children) => {
                let body = self.blocks(children);
                prefix_lines(BlockQuote::prefix(QuoteMarker::InsertBlocks), &body)
            }
            Element::DeleteBlocks(children) => {
                let body = self.blocks(children);
                prefix_lines(BlockQuote::prefix(QuoteMarker::DeleteBlocks), &body)
            }
            Element::List { kind, start, items } => self.list(*kind, *start, items),
            Element::TaskList { items } => self.task_list(items),
            Element::Table(table) => self.table(table),
            Element::DefinitionList { entries } => self.definition_list(entries),
            Element::Footnote { key, children } => {
                let body = self.blocks(children);
                attach_body(&format!("[^{key}]:"), &body)
            }
            Element::Section {
                separator, children, ..
            } => {
                let body = self.blocks(children);
                if body.is_empty() {
                    separator.clone()
                } else {
                    format!("{separator}\n\n{body}")
                }
            }
            Element::SectionBreak { separator, .. } => separator.clone(),
            Element::HorizontalRule { invisible: false } => "---".to_string(),
            Element::HorizontalRule { invisible: true } => "~~~".to_string(),
            Element::CommentBlock(text) => text
                .split('\n')
                .map(|line| format!("{}{line}", Comment::PREFIX))
                .collect::<Vec<_>>()
                .join("\n"),
            Element::HtmlBlock(html) => html.clone(),
            inline => self.inline(std::slice::from_ref(inline)),
        }
    }

    fn list(&mut self, kind: ListKind, start: u64, items: &[ListItem]) -> String {
        let rendered: Vec<(String, bool)> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let marker = match kind {
                    ListKind::Bullet(c) => c.to_string(),
                    ListKind::Ordered => format!("{}.", item.value.unwrap_or(start + idx as u64)),
                    ListKind::Hash => "#.".to_string(),
                };
                self.item(&marker, &item.children)
            })
            .collect();
        join_items(rendered)
    }

    fn task_list(&mut self, items: &[TaskItem]) -> String {
        let rendered: Vec<(String, bool)> = items
            .iter()
            .map(|item| {
                let marker = if item.checked { "[x]" } else { "[ ]" };
                self.item(marker, &item.children)
            })
            .collect();
        join_items(rendered)
    }

    /// One list item and whether it is in block form (first child a block).
    fn item(&mut self, marker: &str, children: &[Element]) -> (String, bool) {
        let block_form = children.first().is_some_and(Element::is_block);
        let body = if block_form {
            self.blocks(children)
        } else {
            let split = children.iter().position(Element::is_block).unwrap_or(children.len());
            let mut parts = vec![self.inline(&children[..split])];
            parts.extend(children[split..].iter().map(|child| self.block(child)));
            parts.join("\n")
        };
        (indent_body(&format!("{marker} "), &body), block_form)
    }

    fn table(&mut self, table: &Table) -> String {
        let mut lines = Vec::with_capacity(table.rows.len() + 3);
        lines.push(self.table_row(&table.headers));
        let separators: Vec<&str> = table
            .column_alignment
            .iter()
            .map(|alignment| match alignment {
                Alignment::Default => "---",
                Alignment::Left => ":--",
                Alignment::Center => ":-:",
                Alignment::Right => "--:",
            })
            .collect();
        lines.push(format!("| {} |", separators.join(" | ")));
        for row in &table.rows {
            lines.push(self.table_row(row));
        }
        match (&table.caption, &table.id) {
            (Some(caption), Some(id)) => lines.push(format!("[{caption}][{id}]")),
            (Some(caption), None) => lines.push(format!("[{caption}]")),
            _ => {}
        }
        lines.join("\n")
    }

    fn table_row(&mut self, cells: &[TableCell]) -> String {
        let present = cells
            .iter()
            .rposition(|cell| cell.content.is_some())
            .map_or(0, |i| i + 1);
        let texts: Vec<String> = cells[..present]
            .iter()
            .map(|cell| {
                cell.content
                    .as_deref()
                    .map(|content| self.inline(content))
                    .unwrap_or_default()
            })
            .collect();
        if texts.is_empty() {
            "|".to_string()
        } else {
            format!("| {} |", texts.join(" | "))
        }
    }

    fn definition_list(&mut self, entries: &[DefinitionEntry]) -> String {
        let rendered: Vec<(String, bool)> = entries.iter().map(|entry| self.definition_entry(entry)).collect();
        join_items(rendered)
    }

    fn definition_entry(&mut self, entry: &DefinitionEntry) -> (String, bool) {
        let mut lines: Vec<String> = entry.terms.iter().map(|term| self.inline(term)).collect();
        let mut block_form = false;
        let mut out = String::new();
        for description in &entry.descriptions {
            if description.first().is_some_and(Element::is_block) {
                block_form = true;
                if !lines.is_empty() {
                    out.push_str(&lines.join("\n"));
                    lines.clear();
                }
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                let body = self.blocks(description);
                out.push_str(&attach_body(":", &body));
            } else {
                lines.push(format!(": {}", self.inline(description)).trim_end().to_string());
            }
        }
        if !lines.is_empty() {
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&lines.join("\n"));
        }
        (out, block_form)
    }

    fn inline_refs(&mut self, elements: &[&Element]) -> String {
        let mut out = String::new();
        self.inline_run(elements.iter().copied(), &mut out);
        out
    }

    fn inline(&mut self, elements: &[Element]) -> String {
        let mut out = String::new();
        self.inline_run(elements, &mut out);
        out
    }

    /// Writes inline siblings. Adjacent text is escaped as one piece, so the
    /// escapes do not depend on where the parser happened to split it.
    fn inline_run<'e>(&mut self, elements: impl IntoIterator<Item = &'e Element>, out: &mut String) {
        let mut text = String::new();
        for element in elements {
            if let Element::Text(t) = element {
                text.push_str(t);
                continue;
            }
            if !text.is_empty() {
                push_escaped(out, &std::mem::take(&mut text));
            }
            self.inline_element(element, out);
        }
        if !text.is_empty() {
            push_escaped(out, &text);
        }
    }

    fn wrapped(&mut self, marker: &str, children: &[Element], out: &mut String) {
        out.push_str(marker);
        self.inline_run(children, out);
        out.push_str(marker);
    }

    fn inline_element(&mut self, element: &Element, out: &mut String) {
        match element {
            Element::Text(text) => push_escaped(out, text),
            Element::InlineCode(code) => {
                if code.contains('`') {
                    out.push_str("`` ");
                    out.push_str(code);
                    out.push_str(" ``");
                } else {
                    out.push('`');
                    out.push_str(code);
                    out.push('`');
                }
            }
            Element::HtmlEntity(body) => {
                out.push('&');
                out.push_str(body);
                out.push(';');
            }
            Element::EmojiRef { shorthand, .. } => out.push_str(shorthand),
            Element::LineBreak => out.push_str("\\\n"),
            Element::AutoLink { url, .. } => {
                out.push('<');
                out.push_str(url);
                out.push('>');
            }
            Element::FootnoteRef { key } => {
                self.referenced.insert(key.clone());
                out.push_str("[^");
                out.push_str(key);
                out.push(']');
            }
            Element::ScriptPlaceholder { source, .. } | Element::ScriptError { source, .. } => {
                out.push_str("{{");
                out.push_str(source);
                out.push_str("}}");
            }
            Element::HashTag(tag) => {
                out.push('#');
                out.push_str(tag);
            }
            Element::HtmlTag(raw) => out.push_str(raw),
            Element::Emphasis(c) => self.wrapped("*", c, out),
            Element::Strong(c) => self.wrapped("**", c, out),
            Element::Underline(c) => self.wrapped("_", c, out),
            Element::Insert(c) => self.wrapped("__", c, out),
            Element::StrikeThrough(c) => self.wrapped("~", c, out),
            Element::Delete(c) => self.wrapped("~~", c, out),
            Element::SuperScript(c) => self.wrapped("^", c, out),
            Element::SubScript(c) => self.wrapped(",,", c, out),
            Element::Link { target, children } => {
                out.push('[');
                self.inline_run(children, out);
                out.push(']');
                match target {
                    LinkTarget::Inline { url, title } => {
                        let source = MediaSource {
                            url: url.clone(),
                            title: title.clone(),
                            ..MediaSource::default()
                        };
                        out.push('(');
                        out.push_str(&Link::format_target(&source));
                        out.push(')');
                    }
                    LinkTarget::Reference(label) => {
                        out.push('[');
                        out.push_str(label);
                        out.push(']');
                    }
                }
            }
            Element::Multimedia {
                sources,
                reference,
                children,
            } => {
                out.push_str("![");
                self.inline_run(children, out);
                out.push(']');
                match reference {
                    Some(label) => {
                        out.push('[');
                        out.push_str(label);
                        out.push(']');
                    }
                    None => {
                        for source in sources {
                            out.push('(');
                            out.push_str(&Link::format_target(source));
                            out.push(')');
                        }
                    }
                }
            }
            block => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&self.block(block));
            }
        }
    }
}

/// Joins rendered items; items in block form are separated by a blank line.
fn join_items(rendered: Vec<(String, bool)>) -> String {
    let mut out = String::new();
    let mut previous_block = false;
    for (idx, (text, block_form)) in rendered.into_iter().enumerate() {
        if idx > 0 {
            out.push_str(if previous_block || block_form { "\n\n" } else { "\n" });
        }
        out.push_str(&text);
        previous_block = block_form;
    }
    out
}

/// Prefixes the first line with `first`; later non-empty lines get a
/// four-space continuation indent.
fn indent_body(first: &str, body: &str) -> String {
    let mut lines = body.split('\n');
    let head = lines.next().unwrap_or_default();
    let mut out = format!("{first}{head}").trim_end().to_string();
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(INDENT);
            out.push_str(line);
        }
    }
    out
}

/// Puts the first block after `marker` on the same line; the rest of that
/// block stays unindented and later blocks are indented so they are absorbed
/// as continuation blocks.
fn attach_body(marker: &str, body: &str) -> String {
    if body.is_empty() {
        return marker.to_string();
    }
    let mut blocks = body.split("\n\n");
    let mut out = format!("{marker} {}", blocks.next().unwrap_or_default());
    for block in blocks {
        out.push_str("\n\n");
        out.push_str(&indent_all(block));
    }
    out
}

fn indent_all(body: &str) -> String {
    body.split('\n')
        .map(|line| if line.is_empty() { String::new() } else { format!("{INDENT}{line}") })
        .collect::<Vec<_>>()
        .join("\n")
}

fn prefix_lines(prefix: &str, body: &str) -> String {
    body.split('\n')
        .map(|line| {
            if line.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix} {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn code_fence(language: Option<&str>, text: &str) -> String {
    let longest = text
        .split(|c| c != CodeFence::TICK)
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = CodeFence::TICK.to_string().repeat((longest + 1).max(CodeFence::MIN_RUN));
    let language = language.unwrap_or_default();
    if text.is_empty() {
        format!("{fence}{language}\n{fence}")
    } else {
        format!("{fence}{language}\n{text}\n{fence}")
    }
}

/// Writes literal text, escaping characters that would otherwise open markup.
fn push_escaped(out: &mut String, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let line_start = out.is_empty() || out.ends_with('\n');
        let next = chars.get(i + 1).copied();
        let escape = match c {
            '\\' | '`' | '*' | '_' | '~' | '[' | ']' | '<' | '>' | '&' | '{' | '^' | '#' | '|' => true,
            ',' => out.ends_with(','),
            '-' | '+' | '=' | ':' | '/' if line_start => true,
            ':' => (out.ends_with("http") || out.ends_with("https")) && chars[i + 1..].starts_with(&['/', '/']),
            '.' => ends_with_ordinal(out) && next.is_none_or(char::is_whitespace),
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
}

/// Whether the current output line is a run of digits that a following
/// `.` would turn into an ordered list marker.
fn ends_with_ordinal(out: &str) -> bool {
    let line = &out[out.rfind('\n').map_or(0, |i| i + 1)..];
    !line.is_empty() && line.len() <= 9 && line.bytes().all(|b| b.is_ascii_digit())
}
