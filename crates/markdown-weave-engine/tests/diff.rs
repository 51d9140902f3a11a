use markdown_weave_engine::generate::outline;
use markdown_weave_engine::{EngineError, diff, parse_document, to_markdown};
use pretty_assertions::assert_eq;

fn diff_texts(old: &str, new: &str, keep_unchanged: bool) -> markdown_weave_engine::Result<String> {
    let old = parse_document(old).unwrap();
    let new = parse_document(new).unwrap();
    Ok(outline(&diff(&old, &new, keep_unchanged)?))
}

#[test]
fn word_insertion_is_minimal() {
    let result = diff_texts("The quick fox", "The quick brown fox", true).unwrap();
    assert_eq!(
        result,
        "Paragraph\n  Text \"The quick \"\n  Insert\n    Text \"brown \"\n  Text \"fox\"\n"
    );
}

#[test]
fn identical_documents_produce_no_changes() {
    let text = "# Title\n\n- a\n- b\n\nBody *text*.";
    assert_eq!(diff_texts(text, text, false).unwrap(), "");
}

#[test]
fn identical_documents_are_kept_whole() {
    let text = "# Title\n\nBody *text*.";
    let doc = parse_document(text).unwrap();
    let result = diff(&doc, &doc, true).unwrap();
    assert_eq!(result.elements, doc.elements);
}

#[test]
fn list_edits_stay_inside_the_item() {
    let result = diff_texts("- alpha one\n- beta two", "- alpha one\n- beta three", true).unwrap();
    assert_eq!(
        result,
        "List bullet '-'\n  Item\n    Text \"alpha one\"\n  Item\n    Text \"beta t\"\n    Delete\n      Text \"wo\"\n    Insert\n      Text \"hree\"\n"
    );
}

#[test]
fn growing_list_is_replaced_whole() {
    let result = diff_texts("- a\n- b", "- a\n- b\n- c", false).unwrap();
    assert!(result.starts_with("DeleteBlocks\n  List"));
    assert!(result.contains("InsertBlocks\n  List"));
}

#[test]
fn diff_output_regenerates_as_markdown() {
    let old = parse_document("Keep this.\n\nDrop this.").unwrap();
    let new = parse_document("Keep this.").unwrap();
    let result = diff(&old, &new, true).unwrap();
    assert_eq!(to_markdown(&result), "Keep this.\n\n~> Drop this.\n");
}

#[test]
fn root_shapes_must_match() {
    let old = parse_document("===\n\ntext").unwrap();
    let new = parse_document("text").unwrap();
    let err = diff(&old, &new, true).unwrap_err();
    assert!(matches!(err, EngineError::IncompatibleRoots { .. }));
    assert_eq!(
        err.to_string(),
        "cannot diff a sectioned document against a flat document"
    );
}
