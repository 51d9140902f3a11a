// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with *some* **content** and `code`[^n].\n\n- Bullet point\n    - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| a | b |\n|---|--:|\n| 1 | 2 |\n\n> Quoted [link](http://example.com) text.\n\n[^n]: A note.\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_complex_markdown(sections: usize, depth: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {section}\n\n"));
        content.push_str(&generate_nested_content(depth, 2));
        content.push('\n');
    }

    content
}

#[allow(dead_code)]
fn generate_nested_content(remaining_depth: usize, current_level: usize) -> String {
    if remaining_depth == 0 {
        return String::new();
    }

    let mut content = String::new();
    let header_prefix = "#".repeat(current_level);

    content.push_str(&format!("{header_prefix} Subsection Level {current_level}\n\n"));
    content.push_str("Some paragraph content with *multiple* sentences. This helps create ~realistic~ document structure for benchmarking.\n\n");

    // Nested bullets, one indent level per heading level
    for i in 0..3 {
        let indent = "    ".repeat(i.min(current_level - 2));
        content.push_str(&format!("{indent}- Item {i} at level {current_level}\n"));
    }
    content.push('\n');

    if current_level % 3 == 0 {
        content.push_str("> A quote with `code` and &amp; an entity.\n\n");
    }

    if remaining_depth > 1 && current_level < 6 {
        content.push_str(&generate_nested_content(remaining_depth - 1, current_level + 1));
    }

    content
}

/// The same document with every `every`-th paragraph edited.
#[allow(dead_code)]
pub fn edit_paragraphs(content: &str, every: usize) -> String {
    content
        .split("\n\n")
        .enumerate()
        .map(|(i, block)| {
            if every > 0 && i % every == 0 && !block.starts_with(['#', '-', '`', '|', '>', '[']) {
                format!("{block} Edited.")
            } else {
                block.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
