//! Text extraction from element subtrees
//!
//! All functions here are pure tree recursions over an immutable document.
//! Each takes the set of excluded node ids so that navigation stripped from a
//! content scope never leaks back in through a parent's text.

use ego_tree::NodeId;
use scraper::{ElementRef, Node};
use std::collections::HashSet;

/// Characters that attach to the preceding word without a space
const CLOSING_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', ')', ']', '}', '%'];

/// Characters that attach to the following word without a space
const OPENING_PUNCTUATION: &[char] = &['(', '[', '{'];

/// Collapses every whitespace run (including non-breaking spaces) to one space and trims
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Concatenated text of all descendant text nodes, whitespace-normalized
pub fn plain_text(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    normalize_whitespace(&raw_text(element, excluded))
}

fn raw_text(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if excluded.contains(&child.id()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.push_str(&raw_text(child_el, excluded));
                }
            }
            _ => {}
        }
    }
    out
}

/// Readable text of a block element with spacing-aware inline merging
///
/// Adjacent element and text pieces are separated by a single space unless
/// whitespace already separates them, so markup such as
/// `the<code>library()</code>function` reads `the `library()` function`.
/// Inline `<code>` becomes a backtick span, `<br>` a space, and nested `<pre>`
/// blocks are left out (they are emitted as their own fenced block).
pub fn inline_text(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    normalize_whitespace(&inline_raw(element, excluded))
}

struct Piece {
    text: String,
    from_element: bool,
}

fn inline_raw(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    let mut pieces = Vec::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => pieces.push(Piece {
                text: text.to_string(),
                from_element: false,
            }),
            Node::Element(el) => {
                if excluded.contains(&child.id()) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let text = match el.name() {
                    "br" => " ".to_string(),
                    "pre" => continue,
                    "code" => {
                        let code = plain_text(child_el, excluded);
                        if code.is_empty() {
                            continue;
                        }
                        format!("`{}`", code)
                    }
                    _ => inline_raw(child_el, excluded),
                };
                pieces.push(Piece {
                    text,
                    from_element: true,
                });
            }
            _ => {}
        }
    }
    join_pieces(pieces)
}

fn join_pieces(pieces: Vec<Piece>) -> String {
    let mut out = String::new();
    let mut last_from_element = false;
    for piece in pieces {
        if piece.text.is_empty() {
            continue;
        }
        if (piece.from_element || last_from_element) && needs_space(&out, &piece.text) {
            out.push(' ');
        }
        out.push_str(&piece.text);
        last_from_element = piece.from_element;
    }
    out
}

fn needs_space(before: &str, next: &str) -> bool {
    let Some(last) = before.chars().last() else {
        return false;
    };
    let Some(first) = next.chars().next() else {
        return false;
    };
    !(last.is_whitespace()
        || first.is_whitespace()
        || CLOSING_PUNCTUATION.contains(&first)
        || OPENING_PUNCTUATION.contains(&last))
}

/// Verbatim text of a code block
///
/// Internal line breaks are preserved, `<br>` elements become newlines, and
/// highlighting spans are flattened. Leading blank lines and trailing
/// whitespace are trimmed; indentation of the first line is kept.
pub fn code_text(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    let raw = code_raw(element, excluded);
    raw.trim_start_matches(['\n', '\r']).trim_end().to_string()
}

fn code_raw(element: ElementRef, excluded: &HashSet<NodeId>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if excluded.contains(&child.id()) {
                    continue;
                }
                if el.name() == "br" {
                    out.push('\n');
                } else if let Some(child_el) = ElementRef::wrap(child) {
                    out.push_str(&code_raw(child_el, excluded));
                }
            }
            _ => {}
        }
    }
    out
}

/// Collapses runs of three or more newlines to a single blank line
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }
    out
}
