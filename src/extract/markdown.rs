//! Structured HTML-to-markdown conversion of a content scope
//!
//! The walk emits one markdown block per structural element:
//!
//! | Element | Block |
//! |---------|-------|
//! | `h1`..`h6` | `#` x level, heading text |
//! | `li` | `- ` item text (nested items folded into the outer one) |
//! | `pre` | fenced code block, verbatim |
//! | `code` outside any block | `` `code` `` line |
//! | `p`, `blockquote`, `dt`, `dd`, `figcaption`, `td`, `th` | inline text |
//!
//! Once a block is emitted its descendants only contribute inline text, with
//! the exception of `pre`, which still becomes its own fenced block.

use crate::dom::text::collapse_blank_lines;
use crate::dom::{heading_level, ContentScope};
use scraper::ElementRef;

/// Elements rendered as a paragraph of inline text
const TEXT_BLOCKS: &[&str] = &["p", "blockquote", "dt", "dd", "figcaption", "td", "th"];

/// Converts a cleaned content scope to markdown
///
/// Falls back to the container's collapsed text when the walk yields no
/// block at all, so a page with text never produces an empty record.
pub fn structured_markdown(scope: &ContentScope, code_language: Option<&str>) -> String {
    let mut blocks = Vec::new();
    let lang = code_language.unwrap_or_default();

    for child in scope.child_elements(scope.root()) {
        emit(scope, child, lang, &mut blocks);
    }

    if blocks.is_empty() {
        return scope.plain_text(scope.root());
    }

    finish(&blocks.join("\n\n"))
}

fn emit(scope: &ContentScope, element: ElementRef, lang: &str, blocks: &mut Vec<String>) {
    let name = element.value().name();

    if let Some(level) = heading_level(name) {
        push_nonempty(blocks, &scope.plain_text(element), |text| {
            format!("{} {}", "#".repeat(level), text)
        });
        return;
    }

    match name {
        "pre" => push_code_block(scope, element, lang, blocks),
        "code" => push_nonempty(blocks, &scope.plain_text(element), |text| format!("`{}`", text)),
        "li" => {
            push_nonempty(blocks, &scope.inline_text(element), |text| format!("- {}", text));
            emit_nested_code_blocks(scope, element, lang, blocks);
        }
        _ if TEXT_BLOCKS.contains(&name) => {
            push_nonempty(blocks, &scope.inline_text(element), str::to_string);
            emit_nested_code_blocks(scope, element, lang, blocks);
        }
        _ => {
            for child in scope.child_elements(element) {
                emit(scope, child, lang, blocks);
            }
        }
    }
}

fn push_nonempty(blocks: &mut Vec<String>, text: &str, render: impl FnOnce(&str) -> String) {
    if !text.is_empty() {
        blocks.push(render(text));
    }
}

fn push_code_block(scope: &ContentScope, pre: ElementRef, lang: &str, blocks: &mut Vec<String>) {
    let code = scope.code_text(pre);
    if !code.trim().is_empty() {
        blocks.push(format!("```{}\n{}\n```", lang, code));
    }
}

/// `pre` blocks below an already emitted block, in document order
fn emit_nested_code_blocks(
    scope: &ContentScope,
    element: ElementRef,
    lang: &str,
    blocks: &mut Vec<String>,
) {
    for child in scope.child_elements(element) {
        if child.value().name() == "pre" {
            push_code_block(scope, child, lang, blocks);
        } else {
            emit_nested_code_blocks(scope, child, lang, blocks);
        }
    }
}

/// Final normalization shared by every block list
fn finish(markdown: &str) -> String {
    collapse_blank_lines(&markdown.replace('\u{a0}', " "))
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ContainerRules, ExtractionProfile};
    use scraper::Html;

    fn convert(html: &str) -> String {
        convert_with(html, None)
    }

    fn convert_with(html: &str, lang: Option<&str>) -> String {
        let document = Html::parse_document(html);
        let rules = ContainerRules::compile(&ExtractionProfile::devsite()).unwrap();
        let scope = rules.scope(&document);
        structured_markdown(&scope, lang)
    }

    #[test]
    fn test_heading_paragraph_list() {
        let html = "<html><body><article><h2>Foo</h2><p>Bar</p><ul><li>Baz</li></ul></article></body></html>";
        assert_eq!(convert(html), "## Foo\n\nBar\n\n- Baz");
    }

    #[test]
    fn test_navigation_is_stripped() {
        let html = r#"<html><body><article>
            <div class="devsite-toc"><p>Contents</p></div>
            <p>Intro</p>
        </article></body></html>"#;
        assert_eq!(convert(html), "Intro");
    }

    #[test]
    fn test_body_fallback() {
        let html = "<html><body><div>Only text</div></body></html>";
        assert_eq!(convert(html), "Only text");
    }

    #[test]
    fn test_code_block_is_fenced_and_verbatim() {
        let html = "<html><body><article><pre><code>//@version=6\n<span>indicator</span>(\"x\")<br>plot(close)\n</code></pre></article></body></html>";
        assert_eq!(
            convert_with(html, Some("pine")),
            "```pine\n//@version=6\nindicator(\"x\")\nplot(close)\n```"
        );
    }

    #[test]
    fn test_inline_code_spacing() {
        let html = "<html><body><article><p>Use the<code>library()</code>function, then <em>call</em>it.</p></article></body></html>";
        assert_eq!(convert(html), "Use the `library()` function, then call it.");
    }

    #[test]
    fn test_standalone_code_line() {
        let html = "<html><body><article><div><code>ta.sma()</code></div></article></body></html>";
        assert_eq!(convert(html), "`ta.sma()`");
    }

    #[test]
    fn test_nested_list_items_fold_into_parent() {
        let html = "<html><body><article><ul><li><p>Outer</p><ul><li>Inner</li></ul></li><li>Second</li></ul></article></body></html>";
        assert_eq!(convert(html), "- Outer Inner\n\n- Second");
    }

    #[test]
    fn test_pre_inside_list_item_still_fenced() {
        let html = "<html><body><article><ul><li>Example:<pre>a = 1</pre></li></ul></article></body></html>";
        assert_eq!(convert(html), "- Example:\n\n```\na = 1\n```");
    }

    #[test]
    fn test_table_and_definition_cells() {
        let html = "<html><body><article><table><tr><th>Name</th><td>Value</td></tr></table><dl><dt>Term</dt><dd>Meaning</dd></dl></article></body></html>";
        assert_eq!(convert(html), "Name\n\nValue\n\nTerm\n\nMeaning");
    }

    #[test]
    fn test_non_breaking_spaces_and_empty_blocks() {
        let html = "<html><body><article><p>\u{a0}</p><p>a\u{a0}b</p><h3> </h3></article></body></html>";
        assert_eq!(convert(html), "a b");
    }

    #[test]
    fn test_output_has_no_triple_newlines() {
        let html = "<html><body><article><pre>a\n\n\n\nb</pre><p>c</p></article></body></html>";
        let out = convert(html);
        assert!(!out.contains("\n\n\n"));
        assert_eq!(out, "```\na\n\nb\n```\n\nc");
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let html = "<html><body><article><h1>T</h1><p>x <code>y</code></p><ol><li>z</li></ol></article></body></html>";
        assert_eq!(convert(html), convert(html));
    }
}
