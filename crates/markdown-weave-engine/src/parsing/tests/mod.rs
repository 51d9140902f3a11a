//! Parser behaviour tests.
//!
//! Every document parsed here also goes through the structural invariant
//! checks in [`crate::parsing::snapshot`].

use pretty_assertions::assert_eq;

use crate::generate::{outline, to_markdown};
use crate::model::{Document, Element, LinkTarget, ListKind, QuoteKind};
use crate::parsing::{parse_document, snapshot};

fn parse(text: &str) -> Document {
    let doc = parse_document(text).unwrap();
    snapshot::invariants(&doc);
    doc
}

fn paragraph(text: &str) -> Element {
    Element::Paragraph(vec![Element::text(text)])
}

// Lists

#[test]
fn repeated_markers_extend_one_list() {
    let doc = parse("- a\n- b\n- c\n");
    let [Element::List { kind, start, items }] = doc.elements.as_slice() else {
        panic!("expected one list, got {:?}", doc.elements);
    };
    assert_eq!(*kind, ListKind::Bullet('-'));
    assert_eq!(*start, 1);
    let children: Vec<&[Element]> = items.iter().map(|i| i.children.as_slice()).collect();
    assert_eq!(
        children,
        vec![
            &[Element::text("a")][..],
            &[Element::text("b")][..],
            &[Element::text("c")][..],
        ]
    );
}

#[test]
fn a_different_bullet_starts_a_new_list() {
    let doc = parse("- a\n- b\n* c\n");
    assert_eq!(doc.elements.len(), 2);
    assert!(matches!(&doc.elements[0], Element::List { kind: ListKind::Bullet('-'), items, .. } if items.len() == 2));
    assert!(matches!(&doc.elements[1], Element::List { kind: ListKind::Bullet('*'), items, .. } if items.len() == 1));
}

#[test]
fn ordered_lists_keep_their_own_numerals() {
    let doc = parse("3. x\n4. y\n");
    let [Element::List { kind, start, items }] = doc.elements.as_slice() else {
        panic!("expected one list, got {:?}", doc.elements);
    };
    assert_eq!(*kind, ListKind::Ordered);
    assert_eq!(*start, 3);
    let values: Vec<Option<u64>> = items.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![Some(3), Some(4)]);
}

#[test]
fn non_monotonic_numbering_is_accepted() {
    let doc = parse("1. one\n7. seven\n2. two\n");
    let [Element::List { items, .. }] = doc.elements.as_slice() else {
        panic!("expected one list");
    };
    let values: Vec<Option<u64>> = items.iter().map(|i| i.value).collect();
    assert_eq!(values, vec![Some(1), Some(7), Some(2)]);
}

#[test]
fn single_item_holds_block_children() {
    let doc = parse("- only\n");
    let [Element::List { items, .. }] = doc.elements.as_slice() else {
        panic!("expected one list");
    };
    assert_eq!(items[0].children, vec![paragraph("only")]);
}

#[test]
fn indented_rows_nest_a_list() {
    let doc = parse("- a\n    - b\n");
    let [Element::List { items, .. }] = doc.elements.as_slice() else {
        panic!("expected one list");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].children[0], paragraph("a"));
    assert!(matches!(
        &items[0].children[1],
        Element::List { kind: ListKind::Bullet('-'), items, .. } if items[0].children == vec![paragraph("b")]
    ));
}

#[test]
fn indented_blocks_after_an_item_are_absorbed() {
    let doc = parse("- item\n\n    more text\n\nafter");
    assert_eq!(doc.elements.len(), 2);
    let Element::List { items, .. } = &doc.elements[0] else {
        panic!("expected a list first");
    };
    assert_eq!(items[0].children, vec![paragraph("item"), paragraph("more text")]);
    assert_eq!(doc.elements[1], paragraph("after"));
}

#[test]
fn task_items_record_their_state() {
    let doc = parse("[x] done\n[ ] open\n");
    let [Element::TaskList { items }] = doc.elements.as_slice() else {
        panic!("expected a task list, got {:?}", doc.elements);
    };
    let states: Vec<bool> = items.iter().map(|i| i.checked).collect();
    assert_eq!(states, vec![true, false]);
}

#[test]
fn adjacent_list_blocks_merge() {
    let doc = parse("- a\n\n- b\n");
    assert!(matches!(doc.elements.as_slice(), [Element::List { items, .. }] if items.len() == 2));
}

#[test]
fn numbers_that_are_not_markers_stay_text() {
    let doc = parse("2.5 percent");
    assert_eq!(doc.elements, vec![paragraph("2.5 percent")]);
}

// Inline fallbacks

#[test]
fn unterminated_emphasis_becomes_text() {
    let doc = parse("*unterminated");
    assert_eq!(
        doc.elements,
        vec![Element::Paragraph(vec![
            Element::text("*"),
            Element::text("unterminated"),
        ])]
    );
}

#[test]
fn emphasis_and_strong() {
    let doc = parse("a *b* **c**");
    assert_eq!(
        doc.elements,
        vec![Element::Paragraph(vec![
            Element::text("a "),
            Element::Emphasis(vec![Element::text("b")]),
            Element::text(" "),
            Element::Strong(vec![Element::text("c")]),
        ])]
    );
}

#[test]
fn bracket_without_target_is_literal() {
    let doc = parse("[text]");
    assert_eq!(
        doc.elements,
        vec![Element::Paragraph(vec![
            Element::text("["),
            Element::text("text"),
            Element::text("]"),
        ])]
    );
}

// Block constructs

#[test]
fn fenced_code_keeps_language_and_body() {
    let doc = parse("```rust\nfn main() {}\n```\n");
    assert_eq!(
        doc.elements,
        vec![Element::CodeBlock {
            language: Some("rust".into()),
            text: "fn main() {}".into(),
        }]
    );
}

#[test]
fn fence_spanning_blank_lines_is_one_block() {
    let doc = parse("```\na\n\nb\n```\n\nafter");
    assert_eq!(
        doc.elements,
        vec![
            Element::CodeBlock {
                language: None,
                text: "a\n\nb".into(),
            },
            paragraph("after"),
        ]
    );
}

#[test]
fn unclosed_fence_falls_through_to_text() {
    let doc = parse("```\nloose");
    assert!(matches!(doc.elements.as_slice(), [Element::Paragraph(_)]));
}

#[test]
fn base64_fence_is_decoded() {
    let doc = parse("```base64\naGVsbG8=\n```");
    assert_eq!(
        doc.elements,
        vec![Element::CodeBlock {
            language: Some("text".into()),
            text: "hello".into(),
        }]
    );
}

#[test]
fn bad_base64_is_kept_raw() {
    let doc = parse("```base64\nnot base64!\n```");
    assert_eq!(
        doc.elements,
        vec![Element::CodeBlock {
            language: Some("base64".into()),
            text: "not base64!".into(),
        }]
    );
}

#[test]
fn indented_blocks_are_code() {
    let doc = parse("    let x = 1;\n\n        nested\n\ntext");
    assert_eq!(
        doc.elements,
        vec![
            Element::CodeBlock {
                language: None,
                text: "let x = 1;\n\n    nested".into(),
            },
            paragraph("text"),
        ]
    );
}

#[test]
fn adjacent_quotes_merge() {
    let doc = parse("> a\n\n> b");
    assert_eq!(
        doc.elements,
        vec![Element::BlockQuote {
            kind: QuoteKind::Quote,
            children: vec![paragraph("a"), paragraph("b")],
        }]
    );
}

#[test]
fn alignment_markers_pick_the_quote_kind() {
    let doc = parse("-> right\n\n<> centre");
    let kinds: Vec<QuoteKind> = doc
        .elements
        .iter()
        .filter_map(|e| match e {
            Element::BlockQuote { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(kinds, vec![QuoteKind::Right, QuoteKind::Center]);
}

#[test]
fn insert_prefix_wraps_blocks() {
    let doc = parse("+> added");
    assert_eq!(doc.elements, vec![Element::InsertBlocks(vec![paragraph("added")])]);
}

#[test]
fn comment_blocks() {
    let doc = parse("// hidden\n// note");
    assert!(matches!(doc.elements.as_slice(), [Element::CommentBlock(_)]));
}

#[test]
fn rules() {
    let doc = parse("---\n\n~~~");
    assert_eq!(
        doc.elements,
        vec![
            Element::HorizontalRule { invisible: false },
            Element::HorizontalRule { invisible: true },
        ]
    );
}

#[test]
fn setext_and_atx_headers() {
    let doc = parse("Title\n=====\n\n## Sub ##");
    assert_eq!(
        doc.elements,
        vec![
            Element::Header {
                level: 1,
                is_prefix_style: false,
                children: vec![Element::text("Title")],
            },
            Element::Header {
                level: 2,
                is_prefix_style: true,
                children: vec![Element::text("Sub")],
            },
        ]
    );
}

#[test]
fn header_row_needs_whitespace() {
    let doc = parse("#tag");
    assert_eq!(doc.elements, vec![Element::Paragraph(vec![Element::HashTag("tag".into())])]);
}

#[test]
fn section_separator_wraps_the_document() {
    let doc = parse("=== 2\n\na\n\n===\n\nb");
    assert_eq!(
        doc.elements,
        vec![Element::Section {
            columns: 2,
            separator: "=== 2".into(),
            children: vec![
                paragraph("a"),
                Element::SectionBreak {
                    columns: 1,
                    separator: "===".into(),
                },
                paragraph("b"),
            ],
        }]
    );
    assert!(doc.is_sectioned());
}

#[test]
fn definition_list_in_one_block() {
    let doc = parse("Term\n: meaning");
    assert_eq!(
        doc.elements,
        vec![Element::DefinitionList {
            entries: vec![crate::model::DefinitionEntry {
                terms: vec![vec![Element::text("Term")]],
                descriptions: vec![vec![Element::text("meaning")]],
            }],
        }]
    );
}

#[test]
fn description_block_attaches_to_the_previous_paragraph() {
    let doc = parse("Term\n\n: meaning");
    let [Element::DefinitionList { entries }] = doc.elements.as_slice() else {
        panic!("expected a definition list, got {:?}", doc.elements);
    };
    assert_eq!(entries[0].terms, vec![vec![Element::text("Term")]]);
    assert_eq!(entries[0].descriptions, vec![vec![paragraph("meaning")]]);
}

// Tables

#[test]
fn ragged_rows_are_padded_with_absent_cells() {
    let doc = parse("| a | b |\n|---|--:|\n| 1 |\n|  | 2 |");
    let [Element::Table(table)] = doc.elements.as_slice() else {
        panic!("expected a table, got {:?}", doc.elements);
    };
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.rows[0][1].content, None);
    assert_eq!(table.rows[1][0].content, Some(vec![]));
    assert_eq!(table.rows[1][1].content, Some(vec![Element::text("2")]));
}

#[test]
fn table_caption_row() {
    let doc = parse("a | b\n--|--\n1 | 2\n[Totals][tab-1]");
    let [Element::Table(table)] = doc.elements.as_slice() else {
        panic!("expected a table");
    };
    assert_eq!(table.caption.as_deref(), Some("Totals"));
    assert_eq!(table.id.as_deref(), Some("tab-1"));
    assert_eq!(table.rows.len(), 1);
}

#[test]
fn lone_footnote_cells_auto_expand() {
    let doc = parse("| a |\n|---|\n| [^n] |\n\n[^n]: note");
    let [Element::Table(table)] = doc.elements.as_slice() else {
        panic!("expected a table");
    };
    assert!(table.rows[0][0].auto_expand);
    assert!(!table.headers[0].auto_expand);
}

// Side tables

#[test]
fn reference_definitions_fill_the_table() {
    let doc = parse("See [docs][].\n\n[Docs]: https://example.com");
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(
        doc.references.get("docs").map(|s| s.url.as_str()),
        Some("https://example.com")
    );
    let Element::Paragraph(children) = &doc.elements[0] else {
        panic!("expected a paragraph");
    };
    assert!(matches!(
        &children[1],
        Element::Link { target: LinkTarget::Reference(label), .. } if label.eq_ignore_ascii_case("docs")
    ));
}

#[test]
fn footnotes_stay_out_of_the_body() {
    let doc = parse("b[^2] a[^1]\n\n[^1]: one\n\n[^2]: two\n\n[^3]: never used");
    assert_eq!(doc.elements.len(), 1);
    assert_eq!(doc.footnotes.order(), &["2".to_string(), "1".to_string()]);
    assert!(doc.footnotes.get("3").is_some());

    let rendered = to_markdown(&doc);
    assert!(rendered.contains("two"));
    assert!(!rendered.contains("never used"));
    assert!(!outline(&doc).contains("never used"));
}

#[test]
fn undefined_footnotes_get_empty_definitions() {
    let doc = parse("x[^gone]");
    assert_eq!(
        doc.footnotes.get("gone"),
        Some(&Element::Footnote {
            key: "gone".into(),
            children: vec![],
        })
    );
}

#[test]
fn inline_footnotes_get_generated_keys() {
    let doc = parse("text^[aside]");
    let Element::Paragraph(children) = &doc.elements[0] else {
        panic!("expected a paragraph");
    };
    let Element::FootnoteRef { key } = &children[1] else {
        panic!("expected a footnote reference, got {children:?}");
    };
    assert_eq!(
        doc.footnotes.get(key),
        Some(&Element::Footnote {
            key: key.clone(),
            children: vec![paragraph("aside")],
        })
    );
}

#[test]
fn blank_inline_notes_stay_literal() {
    let doc = parse("note ^[ ] here");
    assert!(doc.footnotes.is_empty());
    assert_eq!(
        doc.elements,
        vec![Element::Paragraph(vec![
            Element::text("note "),
            Element::text("^["),
            Element::text(" "),
            Element::text("] here"),
        ])]
    );
    assert_eq!(to_markdown(&doc), "note \\^\\[ \\] here\n");
}

// Whole documents

#[test]
fn empty_document() {
    assert!(parse("").elements.is_empty());
    assert!(parse("\n\n\n").elements.is_empty());
}

#[test]
fn mixed_document_outline() {
    let doc = parse("# Notes\n\nSome *text* here.\n\n- one\n- two\n\n> quoted");
    insta::assert_snapshot!(outline(&doc), @r#"
    Header 1
      Text "Notes"
    Paragraph
      Text "Some "
      Emphasis
        Text "text"
      Text " here."
    List bullet '-'
      Item
        Text "one"
      Item
        Text "two"
    BlockQuote Quote
      Paragraph
        Text "quoted"
    "#);
}

// Inline constructs

mod inline {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use crate::capabilities::{EvalContext, EvalError, ExpressionEvaluator, TransparentErrors};
    use crate::error::EngineError;
    use crate::model::{Element, LinkTarget, MediaSource, Metadata};
    use crate::options::{ALLOW_SCRIPT_TAGS_KEY, ParseContext, ParseOptions};
    use crate::parsing::{Parser, parse_inline};

    fn inline(text: &str) -> Vec<Element> {
        parse_inline(text, &ParseContext::default()).unwrap()
    }

    fn text(s: &str) -> Element {
        Element::text(s)
    }

    fn emoji(shorthand: &str, id: &str) -> Element {
        Element::EmojiRef {
            shorthand: shorthand.into(),
            id: id.into(),
        }
    }

    /// Upper-cases its input; `fail` and `secret` raise, `rm ...` is denied.
    struct Shout;

    impl ExpressionEvaluator for Shout {
        fn authorize(&self, source: &str) -> Option<String> {
            source.starts_with("rm").then(|| "not allowed".to_string())
        }

        fn evaluate(&self, source: &str, _context: &EvalContext<'_>) -> Result<String, EvalError> {
            match source {
                "fail" => Err(EvalError::new("Runtime", "boom")),
                "secret" => Err(EvalError::new("Security", "no")),
                _ => Ok(source.to_uppercase()),
            }
        }
    }

    #[test]
    fn emoticons_are_literal_without_a_lookup() {
        assert_eq!(inline("hi :) :smile:"), vec![text("hi :) :smile:")]);
    }

    #[test]
    fn longest_emoticon_wins() {
        let table = BTreeMap::from([
            (":-)".to_string(), "1F603".to_string()),
            (":)".to_string(), "1F642".to_string()),
        ]);
        let ctx = ParseContext::default().with_emoji(&table);
        assert_eq!(
            parse_inline("ok :-) fine", &ctx).unwrap(),
            vec![text("ok "), emoji(":-)", "1F603"), text(" fine")]
        );
    }

    #[test]
    fn emoticons_must_stand_alone() {
        let table = BTreeMap::from([(":)".to_string(), "1F642".to_string())]);
        let ctx = ParseContext::default().with_emoji(&table);
        assert_eq!(parse_inline("a:) :)x", &ctx).unwrap(), vec![text("a:) :)x")]);
    }

    #[test]
    fn shorthands_resolve_through_the_lookup() {
        let table = BTreeMap::from([(":smile:".to_string(), "1F604".to_string())]);
        let ctx = ParseContext::default().with_emoji(&table);
        assert_eq!(
            parse_inline("say :smile: now", &ctx).unwrap(),
            vec![text("say "), emoji(":smile:", "1F604"), text(" now")]
        );
        assert_eq!(
            parse_inline("say :frown: now", &ctx).unwrap(),
            vec![text("say :frown: now")]
        );
    }

    #[test]
    fn code_spans_are_verbatim() {
        assert_eq!(
            inline("use `a*b` and ``x ` y``"),
            vec![
                text("use "),
                Element::InlineCode("a*b".into()),
                text(" and "),
                Element::InlineCode("x ` y".into()),
            ]
        );
        assert_eq!(inline("a `b"), vec![text("a `b")]);
    }

    #[test]
    fn underline_insert_and_strike_markers() {
        assert_eq!(
            inline("_u_ __i__ ~s~ ~~d~~"),
            vec![
                Element::Underline(vec![text("u")]),
                text(" "),
                Element::Insert(vec![text("i")]),
                text(" "),
                Element::StrikeThrough(vec![text("s")]),
                text(" "),
                Element::Delete(vec![text("d")]),
            ]
        );
    }

    #[test]
    fn superscript_and_subscript() {
        assert_eq!(
            inline("x^2^ and H,,2,,O"),
            vec![
                text("x"),
                Element::SuperScript(vec![text("2")]),
                text(" and H"),
                Element::SubScript(vec![text("2")]),
                text("O"),
            ]
        );
    }

    #[test]
    fn inline_link_with_title() {
        assert_eq!(
            inline("see [site](http://x.y \"T\") now"),
            vec![
                text("see "),
                Element::Link {
                    target: LinkTarget::Inline {
                        url: "http://x.y".into(),
                        title: Some("T".into()),
                    },
                    children: vec![text("site")],
                },
                text(" now"),
            ]
        );
    }

    #[test]
    fn chained_targets_make_a_gallery() {
        assert_eq!(
            inline("![cats](a.png 10x20)(b.png)"),
            vec![Element::Multimedia {
                sources: vec![
                    MediaSource {
                        url: "a.png".into(),
                        title: None,
                        width: Some(10),
                        height: Some(20),
                    },
                    MediaSource {
                        url: "b.png".into(),
                        ..MediaSource::default()
                    },
                ],
                reference: None,
                children: vec![text("cats")],
            }]
        );
    }

    #[test]
    fn reference_links_take_their_label() {
        assert_eq!(
            inline("[Go][] [x][Site]"),
            vec![
                Element::Link {
                    target: LinkTarget::Reference("Go".into()),
                    children: vec![text("Go")],
                },
                text(" "),
                Element::Link {
                    target: LinkTarget::Reference("Site".into()),
                    children: vec![text("x")],
                },
            ]
        );
    }

    #[test]
    fn entities_and_arrow_shorthands() {
        assert_eq!(
            inline("a &amp; b &bogus; c"),
            vec![text("a "), Element::HtmlEntity("amp".into()), text(" b &bogus; c")]
        );
        assert_eq!(
            inline("x -> y <= z"),
            vec![
                text("x "),
                Element::HtmlEntity("rarr".into()),
                text(" y "),
                Element::HtmlEntity("le".into()),
                text(" z"),
            ]
        );
    }

    #[test]
    fn tags_and_autolinks() {
        assert_eq!(
            inline("<b>bold</b> <https://e.x> <me@e.x>"),
            vec![
                Element::HtmlTag("<b>".into()),
                text("bold"),
                Element::HtmlTag("</b>".into()),
                text(" "),
                Element::AutoLink {
                    url: "https://e.x".into(),
                    is_mail: false,
                },
                text(" "),
                Element::AutoLink {
                    url: "me@e.x".into(),
                    is_mail: true,
                },
            ]
        );
    }

    #[test]
    fn scripts_are_code_unless_both_sides_allow_them() {
        let source = "<script>x()</script>";
        assert_eq!(inline(source), vec![Element::InlineCode(source.into())]);

        let ctx = ParseContext::new(ParseOptions {
            allow_script_tags: true,
        });
        assert_eq!(
            parse_inline(source, &ctx).unwrap(),
            vec![Element::InlineCode(source.into())]
        );

        let mut metadata = Metadata::default();
        metadata.insert(ALLOW_SCRIPT_TAGS_KEY, "yes", false);
        let doc = Parser::new(&ctx).with_metadata(metadata).parse(source).unwrap();
        assert_eq!(
            doc.elements,
            vec![Element::Paragraph(vec![Element::HtmlTag(source.into())])]
        );
    }

    #[test]
    fn placeholders_need_an_evaluator() {
        assert_eq!(inline("a {{ name }} b"), vec![text("a {{ name }} b")]);

        let ctx = ParseContext::default().with_evaluator(&Shout);
        assert_eq!(
            parse_inline("a {{ name }} b", &ctx).unwrap(),
            vec![
                text("a "),
                Element::ScriptPlaceholder {
                    source: "name".into(),
                    value: "NAME".into(),
                },
                text(" b"),
            ]
        );
    }

    #[test]
    fn evaluator_failures_render_inline() {
        let ctx = ParseContext::default().with_evaluator(&Shout);
        assert_eq!(
            parse_inline("{{fail}} {{rm -rf}}", &ctx).unwrap(),
            vec![
                Element::ScriptError {
                    source: "fail".into(),
                    message: "Runtime: boom".into(),
                },
                text(" "),
                Element::ScriptError {
                    source: "rm -rf".into(),
                    message: "not allowed".into(),
                },
            ]
        );
    }

    #[test]
    fn transparent_failures_reach_the_caller() {
        let ctx = ParseContext::default()
            .with_evaluator(&Shout)
            .with_transparent(TransparentErrors::new().with("Security"));
        let err = parse_inline("x {{secret}}", &ctx).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Evaluation { ref category, ref message } if category == "Security" && message == "no"
        ));
    }

    #[test]
    fn escapes_and_hashtags() {
        assert_eq!(inline(r"\*not\* a\q"), vec![text(r"*not* a\q")]);
        assert_eq!(
            inline("tag #rust-lang and a#b"),
            vec![text("tag "), Element::HashTag("rust-lang".into()), text(" and a#b")]
        );
    }

    #[test]
    fn bare_urls_drop_trailing_punctuation() {
        assert_eq!(
            inline("visit https://example.com/x. ok"),
            vec![
                text("visit "),
                Element::AutoLink {
                    url: "https://example.com/x".into(),
                    is_mail: false,
                },
                text(". ok"),
            ]
        );
    }
}
