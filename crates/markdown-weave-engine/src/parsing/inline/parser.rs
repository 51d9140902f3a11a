use crate::capabilities::EvalContext;
use crate::error::{EngineError, Result};
use crate::model::{Element, LinkTarget, MediaSource};
use crate::parsing::blocks::{BlockParser, ListMarker};
use crate::parsing::segment::Block;

use super::cursor::{Cursor, Mark};
use super::kinds::script::is_escapable;
use super::kinds::{BareUrl, CodeSpan, Emoji, Emphasis, Entity, HtmlTag, Link, Script, Verbatim};

/// A closing delimiter an open span is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminator {
    pub ch: char,
    pub run: usize,
    /// Closers must follow a non-whitespace character (`a*`, not `a *`).
    pub flanking: bool,
}

/// Output of one span: finished elements plus a pending text buffer that is
/// flushed before any element is appended.
#[derive(Debug, Default)]
struct Sink {
    out: Vec<Element>,
    text: String,
}

impl Sink {
    fn push_char(&mut self, c: char) {
        self.text.push(c);
    }

    fn push(&mut self, element: Element) {
        self.flush();
        self.out.push(element);
    }

    fn extend(&mut self, elements: Vec<Element>) {
        for element in elements {
            self.push(element);
        }
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Element::Text(std::mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Vec<Element> {
        if self.text.trim().is_empty() && !self.out.is_empty() {
            self.text.clear();
        }
        self.flush();
        self.out
    }
}

/// The inline character state machine.
///
/// Dispatches on the leading character of each construct. Ambiguous
/// constructs are resolved by saving a [`Mark`], trying, and restoring on
/// mismatch; at most one mark is pending per decision.
pub struct InlineParser<'p, 'a> {
    parser: &'p mut BlockParser<'a>,
    cursor: Cursor<'p>,
    terminators: Vec<Terminator>,
}

impl<'p, 'a> InlineParser<'p, 'a> {
    pub fn new(
        parser: &'p mut BlockParser<'a>,
        rows: &'p [String],
        positions: &'p [usize],
        start_row: usize,
        end_row: usize,
    ) -> Self {
        Self {
            parser,
            cursor: Cursor::new(rows, positions, start_row, end_row),
            terminators: Vec::new(),
        }
    }

    /// Parses until `terminator` repeated `run_length` times, or to the end.
    ///
    /// The flag is false when a terminator was requested and never found.
    pub fn parse(mut self, terminator: Option<char>, run_length: usize) -> Result<(Vec<Element>, bool)> {
        let term = terminator.map(|ch| Terminator {
            ch,
            run: run_length.max(1),
            flanking: false,
        });
        self.parse_span(term, false)
    }

    fn parse_span(&mut self, term: Option<Terminator>, accept_incomplete: bool) -> Result<(Vec<Element>, bool)> {
        if let Some(t) = term {
            self.terminators.push(t);
        }
        let mut sink = Sink::default();
        let scanned = self.scan(&mut sink, term);
        if term.is_some() {
            self.terminators.pop();
        }
        let completed = scanned?;
        Ok((sink.finish(), completed || accept_incomplete))
    }

    fn scan(&mut self, sink: &mut Sink, term: Option<Terminator>) -> Result<bool> {
        loop {
            let Some(c) = self.cursor.peek() else {
                return Ok(term.is_none());
            };
            if let Some(t) = term
                && self.closes(t)
            {
                self.cursor.bump_n(t.run);
                return Ok(true);
            }
            if self.meets_enclosing(term.is_some()) {
                return Ok(false);
            }
            if self.cursor.at_row_break() {
                self.row_break(sink);
                continue;
            }
            if self.cursor.at_row_start()
                && self.cursor.row() > self.cursor.start_row()
                && self.terminators.is_empty()
                && self.nested_list(sink)?
            {
                continue;
            }
            if self.parser.context().emoji.is_some() && Emoji::may_start(c) && self.emoji(sink) {
                continue;
            }
            self.dispatch(c, sink)?;
        }
    }

    fn dispatch(&mut self, c: char, sink: &mut Sink) -> Result<()> {
        match c {
            '\\' => self.escape(sink),
            CodeSpan::TICK => self.code_span(sink),
            c if Emphasis::is_marker(c) => return self.emphasis(c, sink),
            Emphasis::SUPER => return self.caret(sink),
            Emphasis::SUB if self.cursor.peek_at(1) == Some(Emphasis::SUB) => return self.subscript(sink),
            Link::OPEN => return self.bracket(false, sink),
            Link::IMAGE if self.cursor.peek_at(1) == Some(Link::OPEN) => return self.bracket(true, sink),
            Entity::AMP => self.entity(sink),
            HtmlTag::OPEN => return self.angle(sink),
            '{' if self.cursor.starts_with(Script::OPEN) && self.parser.context().evaluator.is_some() => {
                return self.expression(sink);
            }
            '#' => self.hashtag(sink),
            'h' => self.bare_url(sink),
            '-' | '=' | '>' => self.arrow(sink),
            _ => self.literal(sink),
        }
        Ok(())
    }

    fn save(&self, sink: &Sink) -> Mark {
        Mark {
            row: self.cursor.row(),
            col: self.cursor.col(),
            produced: sink.out.len(),
            pending: sink.text.len(),
        }
    }

    fn restore(&mut self, mark: Mark, sink: &mut Sink) {
        self.cursor.seek(mark.row, mark.col);
        sink.out.truncate(mark.produced);
        sink.text.truncate(mark.pending);
    }

    fn literal(&mut self, sink: &mut Sink) {
        if let Some(c) = self.cursor.next_char() {
            sink.push_char(c);
        }
    }

    fn literal_run(&mut self, n: usize, sink: &mut Sink) {
        for _ in 0..n {
            self.literal(sink);
        }
    }

    /// Whether the cursor sits on a closer for `t`.
    fn closes(&self, t: Terminator) -> bool {
        if self.cursor.peek() != Some(t.ch) {
            return false;
        }
        let run = self.cursor.run_length(t.ch);
        if run < t.run {
            return false;
        }
        if t.flanking && self.cursor.prev_char().is_none_or(char::is_whitespace) {
            return false;
        }
        run == t.run
            || !self
                .cursor
                .peek_same_row(run)
                .is_some_and(char::is_alphanumeric)
    }

    /// Whether an enclosing span's closer is next, which ends this span unfinished.
    fn meets_enclosing(&self, has_own: bool) -> bool {
        let enclosing = if has_own {
            &self.terminators[..self.terminators.len().saturating_sub(1)]
        } else {
            &self.terminators[..]
        };
        enclosing.iter().any(|t| self.closes(*t))
    }

    fn row_break(&mut self, sink: &mut Sink) {
        self.cursor.next_char();
        if sink.text.ends_with("  ") {
            let kept = sink.text.trim_end_matches(' ').len();
            sink.text.truncate(kept);
            sink.push(Element::LineBreak);
        } else {
            sink.push_char('\n');
        }
    }

    /// Hands the remaining rows to the block parser when a row opens a list item.
    fn nested_list(&mut self, sink: &mut Sink) -> Result<bool> {
        let row = self.cursor.row();
        let source = self.cursor.source();
        if ListMarker::detect(&source[row]).is_none() {
            return Ok(false);
        }
        let end = self.cursor.end_row();
        let positions = self.cursor.positions();
        let Some(block) = Block::from_rows(
            source[row..end].to_vec(),
            positions[row..end.min(positions.len())].to_vec(),
            0,
        ) else {
            return Ok(false);
        };
        log::trace!("row {row} opens a nested list");
        if sink.text.ends_with('\n') {
            sink.text.pop();
        }
        let elements = self.parser.parse_blocks(&[block], 0, 1)?;
        sink.extend(elements);
        self.cursor.skip_to_end();
        Ok(true)
    }

    fn escape(&mut self, sink: &mut Sink) {
        self.cursor.next_char();
        match self.cursor.peek() {
            Some('\n') if self.cursor.at_row_break() => {
                self.cursor.next_char();
                sink.push(Element::LineBreak);
            }
            Some(c) if is_escapable(c) => {
                self.cursor.next_char();
                sink.push_char(c);
            }
            _ => sink.push_char('\\'),
        }
    }

    fn code_span(&mut self, sink: &mut Sink) {
        let run = self.cursor.run_length(CodeSpan::TICK);
        if run > CodeSpan::MAX_RUN {
            self.literal_run(run, sink);
            return;
        }
        let mark = self.save(sink);
        self.cursor.bump_n(run);
        let mut content = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    self.restore(mark, sink);
                    self.literal_run(run, sink);
                    return;
                }
                Some(CodeSpan::TICK) => {
                    let closing = self.cursor.run_length(CodeSpan::TICK);
                    self.cursor.bump_n(closing);
                    if closing == run {
                        break;
                    }
                    content.extend(std::iter::repeat_n(CodeSpan::TICK, closing));
                }
                Some(_) => {
                    if let Some(c) = self.cursor.next_char() {
                        content.push(c);
                    }
                }
            }
        }
        if run == 2 && content.len() >= 2 && content.starts_with(' ') && content.ends_with(' ') {
            content = content[1..content.len() - 1].to_string();
        }
        sink.push(Element::InlineCode(content));
    }

    fn emphasis(&mut self, c: char, sink: &mut Sink) -> Result<()> {
        let full = self.cursor.run_length(c);
        let run = full.min(2);
        let opens = self
            .cursor
            .peek_same_row(run)
            .is_some_and(|next| !next.is_whitespace());
        let intraword = c == '_' && self.cursor.prev_char().is_some_and(char::is_alphanumeric);
        if !opens || intraword {
            self.literal_run(full, sink);
            return Ok(());
        }
        self.cursor.bump_n(run);
        let (children, completed) = self.parse_span(
            Some(Terminator {
                ch: c,
                run,
                flanking: true,
            }),
            false,
        )?;
        if completed {
            sink.push(Emphasis::wrap(c, run, children));
        } else {
            self.fix_syntax_error(&c.to_string().repeat(run), children, sink);
        }
        Ok(())
    }

    /// Re-emits an unmatched opening marker as literal text followed by the
    /// children already parsed after it.
    fn fix_syntax_error(&mut self, marker: &str, children: Vec<Element>, sink: &mut Sink) {
        log::trace!("unterminated {marker:?} span recovered as text");
        sink.push(Element::text(marker));
        sink.extend(children);
    }

    fn caret(&mut self, sink: &mut Sink) -> Result<()> {
        if self.cursor.peek_at(1) == Some(Link::OPEN) {
            return self.inline_footnote(sink);
        }
        if self
            .cursor
            .peek_same_row(1)
            .is_none_or(|c| c.is_whitespace() || c == Emphasis::SUPER)
        {
            self.literal(sink);
            return Ok(());
        }
        self.cursor.bump_n(1);
        let (children, completed) = self.parse_span(
            Some(Terminator {
                ch: Emphasis::SUPER,
                run: 1,
                flanking: true,
            }),
            false,
        )?;
        if completed {
            sink.push(Emphasis::wrap(Emphasis::SUPER, 1, children));
        } else {
            self.fix_syntax_error("^", children, sink);
        }
        Ok(())
    }

    fn subscript(&mut self, sink: &mut Sink) -> Result<()> {
        if self.cursor.peek_same_row(2).is_none_or(char::is_whitespace) {
            self.literal_run(2, sink);
            return Ok(());
        }
        self.cursor.bump_n(2);
        let (children, completed) = self.parse_span(
            Some(Terminator {
                ch: Emphasis::SUB,
                run: 2,
                flanking: true,
            }),
            false,
        )?;
        if completed {
            sink.push(Emphasis::wrap(Emphasis::SUB, 2, children));
        } else {
            self.fix_syntax_error(",,", children, sink);
        }
        Ok(())
    }

    fn inline_footnote(&mut self, sink: &mut Sink) -> Result<()> {
        self.cursor.bump_n(2);
        let (children, completed) = self.parse_span(Some(bracket_terminator()), false)?;
        if !completed {
            self.fix_syntax_error("^[", children, sink);
            return Ok(());
        }
        if children.iter().all(|c| matches!(c, Element::Text(t) if t.trim().is_empty())) {
            sink.push(Element::text("^["));
            sink.extend(children);
            sink.push_char(Link::CLOSE);
            return Ok(());
        }
        let footnotes = &mut self.parser.footnotes;
        let key = footnotes.generate_key();
        footnotes.define(&key, vec![Element::Paragraph(children)]);
        footnotes.reference(&key);
        sink.push(Element::FootnoteRef { key });
        Ok(())
    }

    fn footnote_ref(&mut self, sink: &mut Sink) {
        let rest = self.cursor.rest_of_row();
        let key = rest[2..]
            .split(Link::CLOSE)
            .next()
            .filter(|k| rest[2..].contains(Link::CLOSE) && !k.is_empty() && !k.contains(char::is_whitespace));
        match key {
            Some(key) => {
                let key = key.to_string();
                self.cursor.bump_n(key.chars().count() + 3);
                self.parser.footnotes.reference(&key);
                sink.push(Element::FootnoteRef { key });
            }
            None => self.literal(sink),
        }
    }

    fn bracket(&mut self, image: bool, sink: &mut Sink) -> Result<()> {
        if !image && self.cursor.peek_at(1) == Some(Link::FOOTNOTE) {
            self.footnote_ref(sink);
            return Ok(());
        }
        let at_row_start = self.cursor.at_row_start();
        let opener = if image { "![" } else { "[" };
        self.cursor.bump_n(opener.len());
        let (children, completed) = self.parse_span(Some(bracket_terminator()), false)?;
        if !completed {
            self.fix_syntax_error(opener, children, sink);
            return Ok(());
        }

        match self.cursor.peek() {
            Some(Link::TARGET_OPEN) => {
                if let Some(sources) = self.targets(image) {
                    sink.push(if image {
                        Element::Multimedia {
                            sources,
                            reference: None,
                            children,
                        }
                    } else {
                        let MediaSource { url, title, .. } = sources.into_iter().next().unwrap_or_default();
                        Element::Link {
                            target: LinkTarget::Inline { url, title },
                            children,
                        }
                    });
                    return Ok(());
                }
            }
            Some(Link::OPEN) => {
                if let Some(label) = self.reference_label() {
                    let label = if label.is_empty() {
                        plain_label(&children)
                    } else {
                        label
                    };
                    sink.push(if image {
                        Element::Multimedia {
                            sources: vec![],
                            reference: Some(label),
                            children,
                        }
                    } else {
                        Element::Link {
                            target: LinkTarget::Reference(label),
                            children,
                        }
                    });
                    return Ok(());
                }
            }
            Some(':') if at_row_start && !image => {
                if self.reference_definition(&children) {
                    return Ok(());
                }
            }
            _ => {}
        }

        sink.push(Element::text(opener));
        sink.extend(children);
        sink.push_char(Link::CLOSE);
        Ok(())
    }

    /// Reads one `( ... )` target, or several chained ones for an image gallery.
    fn targets(&mut self, image: bool) -> Option<Vec<MediaSource>> {
        let mut sources = Vec::new();
        while self.cursor.peek() == Some(Link::TARGET_OPEN) {
            let rest = self.cursor.rest_of_row();
            let Some(close) = target_end(&rest) else {
                break;
            };
            let Some(source) = Link::parse_target(&rest[1..close]) else {
                break;
            };
            self.cursor.bump_n(rest[..=close].chars().count());
            sources.push(source);
            if !image {
                break;
            }
        }
        (!sources.is_empty()).then_some(sources)
    }

    fn reference_label(&mut self) -> Option<String> {
        let rest = self.cursor.rest_of_row();
        let end = rest.find(Link::CLOSE)?;
        let label = &rest[1..end];
        if label.contains(Link::OPEN) {
            return None;
        }
        self.cursor.bump_n(rest[..=end].chars().count());
        Some(label.to_string())
    }

    fn reference_definition(&mut self, children: &[Element]) -> bool {
        let rest = self.cursor.rest_of_row();
        let body = rest[1..].trim();
        if body.is_empty() {
            return false;
        }
        let Some(source) = Link::parse_target(body) else {
            return false;
        };
        let label = plain_label(children);
        log::debug!("reference definition [{label}] -> {}", source.url);
        self.parser.references.insert(&label, source);
        self.cursor.skip_row();
        if self.cursor.at_row_break() {
            self.cursor.next_char();
        }
        true
    }

    fn entity(&mut self, sink: &mut Sink) {
        let rest = self.cursor.rest_of_row();
        match Entity::scan(&rest[1..]) {
            Some(body) => {
                self.cursor.bump_n(body.chars().count() + 2);
                sink.push(Element::HtmlEntity(body.to_string()));
            }
            None => self.literal(sink),
        }
    }

    fn shorthand(&mut self, table: &[(&str, &str)], sink: &mut Sink) -> bool {
        for (pattern, name) in table {
            if self.cursor.starts_with(pattern) {
                self.cursor.bump_n(pattern.chars().count());
                sink.push(Element::HtmlEntity((*name).to_string()));
                return true;
            }
        }
        false
    }

    fn arrow(&mut self, sink: &mut Sink) {
        if !self.shorthand(Entity::OTHER_SHORTHANDS, sink) {
            self.literal(sink);
        }
    }

    fn angle(&mut self, sink: &mut Sink) -> Result<()> {
        if self.shorthand(Entity::LT_SHORTHANDS, sink) {
            return Ok(());
        }
        let at_block_start = self.cursor.row() == self.cursor.start_row()
            && self.cursor.at_row_start()
            && sink.out.is_empty()
            && sink.text.is_empty()
            && self.terminators.is_empty();

        let mark = self.save(sink);
        let Some(body) = self.tag_body() else {
            self.restore(mark, sink);
            self.literal(sink);
            return Ok(());
        };

        if let Some((url, is_mail)) = HtmlTag::autolink(&body) {
            sink.push(Element::AutoLink { url, is_mail });
        } else if at_block_start && HtmlTag::is_block_tag(&body) {
            let source = self.cursor.source();
            let html = source[self.cursor.start_row()..self.cursor.end_row()].join("\n");
            self.cursor.skip_to_end();
            sink.push(Element::HtmlBlock(html));
        } else if let Some(kind) = HtmlTag::verbatim(&body) {
            let content = self.verbatim_content(kind);
            let raw = format!("<{body}>{content}");
            let allowed = self.parser.context().options.allow_script_tags
                && self
                    .parser
                    .metadata()
                    .is_enabled(crate::options::ALLOW_SCRIPT_TAGS_KEY);
            sink.push(match kind {
                Verbatim::Script if !allowed => {
                    log::debug!("script tag suppressed to code");
                    Element::InlineCode(raw)
                }
                _ => Element::HtmlTag(raw),
            });
        } else {
            sink.push(Element::HtmlTag(format!("<{body}>")));
        }
        Ok(())
    }

    /// Consumes `<...>` and returns the text between the angle brackets.
    fn tag_body(&mut self) -> Option<String> {
        if !self.cursor.peek_at(1).is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!') {
            return None;
        }
        self.cursor.next_char();
        let mut body = String::new();
        loop {
            match self.cursor.next_char()? {
                HtmlTag::CLOSE => break,
                HtmlTag::OPEN => return None,
                c => body.push(c),
            }
        }
        HtmlTag::is_tag_body(&body).then_some(body)
    }

    /// Everything up to and including the close tag, or the rest of the input.
    fn verbatim_content(&mut self, kind: Verbatim) -> String {
        let close = kind.close_tag();
        let mut content = String::new();
        while let Some(c) = self.cursor.next_char() {
            content.push(c);
            if content.len() >= close.len()
                && content.is_char_boundary(content.len() - close.len())
                && content[content.len() - close.len()..].eq_ignore_ascii_case(close)
            {
                break;
            }
        }
        content
    }

    fn expression(&mut self, sink: &mut Sink) -> Result<()> {
        let Some(evaluator) = self.parser.context().evaluator else {
            self.literal(sink);
            return Ok(());
        };
        let position = self.cursor.position();
        let mark = self.save(sink);
        self.cursor.bump_n(Script::OPEN.len());
        let mut inner = String::new();
        let mut depth = 0usize;
        loop {
            match self.cursor.next_char() {
                None => {
                    self.restore(mark, sink);
                    self.literal(sink);
                    return Ok(());
                }
                Some('{') => {
                    depth += 1;
                    inner.push('{');
                }
                Some('}') if depth > 0 => {
                    depth -= 1;
                    inner.push('}');
                }
                Some('}') if self.cursor.peek() == Some('}') => {
                    self.cursor.bump_n(Script::CLOSE.len() - 1);
                    break;
                }
                Some(c) => inner.push(c),
            }
        }

        let source = inner.trim().to_string();
        if let Some(denied) = evaluator.authorize(&source) {
            log::warn!("expression {source:?} denied: {denied}");
            sink.push(Element::ScriptError {
                source,
                message: denied,
            });
            return Ok(());
        }

        let context = EvalContext {
            metadata: self.parser.metadata(),
            position,
        };
        match evaluator.evaluate(&source, &context) {
            Ok(value) => sink.push(Element::ScriptPlaceholder { source, value }),
            Err(err) => {
                for (category, message) in err.leaves() {
                    if self.parser.context().transparent.contains(category) {
                        return Err(EngineError::Evaluation {
                            category: category.to_string(),
                            message: message.to_string(),
                        });
                    }
                    log::warn!("expression {source:?} failed: {category}: {message}");
                    sink.push(Element::ScriptError {
                        source: source.clone(),
                        message: format!("{category}: {message}"),
                    });
                }
            }
        }
        Ok(())
    }

    fn hashtag(&mut self, sink: &mut Sink) {
        let starts_word = self.cursor.prev_char().is_none_or(|c| !c.is_alphanumeric());
        if !starts_word || !self.cursor.peek_same_row(1).is_some_and(char::is_alphanumeric) {
            self.literal(sink);
            return;
        }
        self.cursor.next_char();
        let mut tag = String::new();
        while let Some(c) = self.cursor.peek_same_row(0) {
            if !(c.is_alphanumeric() || c == '_' || c == '-') {
                break;
            }
            tag.push(c);
            self.cursor.next_char();
        }
        sink.push(Element::HashTag(tag));
    }

    fn bare_url(&mut self, sink: &mut Sink) {
        let starts_word = self.cursor.prev_char().is_none_or(|c| !c.is_alphanumeric());
        let has_scheme = BareUrl::SCHEMES.iter().any(|s| self.cursor.starts_with(s));
        if starts_word
            && has_scheme
            && let Some(len) = BareUrl::match_len(&self.cursor.rest_of_row())
        {
            let url: String = self.cursor.rest_of_row().chars().take(len).collect();
            self.cursor.bump_n(len);
            sink.push(Element::AutoLink { url, is_mail: false });
            return;
        }
        self.literal(sink);
    }

    /// `:name:` shorthands first, then emoticons by longest match.
    fn emoji(&mut self, sink: &mut Sink) -> bool {
        let Some(lookup) = self.parser.context().emoji else {
            return false;
        };

        if self.cursor.peek() == Some(Emoji::COLON) {
            let rest = self.cursor.rest_of_row();
            let name: String = rest[1..].chars().take_while(|&c| Emoji::is_name_char(c)).collect();
            if !name.is_empty() && rest[1 + name.len()..].starts_with(Emoji::COLON) {
                let shorthand = format!(":{name}:");
                if let Some(id) = lookup.try_resolve(&shorthand) {
                    self.cursor.bump_n(shorthand.chars().count());
                    sink.push(Element::EmojiRef { shorthand, id });
                    return true;
                }
            }
        }

        if self.cursor.prev_char().is_some_and(char::is_alphanumeric) {
            return false;
        }
        let upcoming = self.cursor.peek_chars(4);
        for candidate in Emoji::candidates(&upcoming) {
            let mark = self.save(sink);
            self.cursor.bump_n(candidate.chars().count());
            let bounded = !self.cursor.peek().is_some_and(char::is_alphanumeric);
            if bounded && let Some(id) = lookup.try_resolve(candidate) {
                sink.push(Element::EmojiRef {
                    shorthand: candidate.to_string(),
                    id,
                });
                return true;
            }
            log::trace!("emoticon candidate {candidate:?} rejected");
            self.restore(mark, sink);
        }
        false
    }
}

fn bracket_terminator() -> Terminator {
    Terminator {
        ch: Link::CLOSE,
        run: 1,
        flanking: false,
    }
}

/// Reference labels are derived from the plain text of the link children.
fn plain_label(children: &[Element]) -> String {
    children.iter().map(Element::to_plain_text).collect()
}

/// Index of the `)` closing the target that opens `rest`, skipping quoted
/// titles and balanced parentheses inside the url.
fn target_end(rest: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in rest.char_indices() {
        match c {
            '"' => quoted = !quoted,
            Link::TARGET_OPEN if !quoted => depth += 1,
            Link::TARGET_CLOSE if !quoted => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
