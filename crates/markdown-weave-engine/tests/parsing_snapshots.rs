use insta::assert_snapshot;
use markdown_weave_engine::generate::outline;
use markdown_weave_engine::parsing::{parse_document, snapshot};
use markdown_weave_engine::to_markdown;
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/{name}.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

/// Parses a fixture, checks invariants and that regeneration is stable.
fn assert_fixture(name: &str) -> String {
    let md = fixture(name);
    let doc = parse_document(&md).unwrap();
    snapshot::invariants(&doc);

    let once = to_markdown(&doc);
    let reparsed = parse_document(&once).unwrap();
    snapshot::invariants(&reparsed);
    assert_eq!(to_markdown(&reparsed), once, "regeneration of {name} is not stable");
    once
}

#[test]
fn fixture_canonical() {
    assert_eq!(assert_fixture("canonical"), fixture("canonical"));
}

#[test]
fn fixture_footnotes() {
    assert_fixture("footnotes");
}

#[test]
fn fixture_sections() {
    assert_fixture("sections");
}

#[test]
fn fixture_nested_list() {
    assert_fixture("nested_list");
}

#[test]
fn table_outline() {
    let doc = parse_document("| a | b |\n|---|--:|\n| 1 |").unwrap();
    assert_snapshot!(outline(&doc), @r#"
    Table columns=2
      HeaderRow
        Cell
          Text "a"
        Cell
          Text "b"
      Row
        Cell
          Text "1"
        Cell (none)
    "#);
}

#[test]
fn referenced_footnotes_follow_the_body() {
    let doc = parse_document("a[^n]\n\n[^n]: note\n\n[^x]: unused").unwrap();
    assert_snapshot!(outline(&doc), @r#"
    Paragraph
      Text "a"
      FootnoteRef n
    Footnote n
      Paragraph
        Text "note"
    "#);
}

#[test]
fn section_outline() {
    let doc = parse_document(&fixture("sections")).unwrap();
    assert_snapshot!(outline(&doc), @r#"
    Section columns=2 "==== 2"
      Paragraph
        Text "first"
      SectionBreak columns=1 "===="
      Paragraph
        Text "second"
    "#);
}

#[test]
fn snapshot_records_side_tables() {
    let doc = parse_document("[home]: /index\n\nnote[^a]\n\n[^a]: first\n\n[^b]: spare").unwrap();
    let snap = snapshot::normalize(&doc);
    assert_eq!(snap.references, vec!["home -> /index".to_string()]);
    let keys: Vec<(&str, bool)> = snap
        .footnotes
        .iter()
        .map(|f| (f.key.as_str(), f.referenced))
        .collect();
    assert_eq!(keys, vec![("a", true), ("b", false)]);
    assert_eq!(snap.footnotes[1].outline, vec!["Paragraph", "  Text \"spare\""]);
}
