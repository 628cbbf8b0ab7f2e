//! Post-processing for markdown produced by a generic HTML converter
//!
//! Generic converters keep everything a page renders: menus before the
//! article, pager links, copy-button labels, community footers. The cleaner
//! strips those line by line and repairs code blocks that came through as a
//! single backtick span over several lines.

use crate::dom::text::collapse_blank_lines;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// `[text](url)`
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("hardcoded link regex"));

static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)]+").expect("hardcoded url regex"));

/// Phrases and markers the cleaner removes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CleanerProfile {
    /// Lines containing any of these (case-insensitive) are removed
    pub on_page_markers: Vec<String>,

    /// Everything from the first line containing this marker on is dropped;
    /// empty disables the cut
    pub footer_marker: String,

    /// Lines starting with any of these are pager links
    pub pager_prefixes: Vec<String>,

    /// Lines consisting only of one of these are removed
    pub copy_markers: Vec<String>,

    /// Lines containing any of these are community/social footer entries
    pub social_phrases: Vec<String>,

    /// Leading text that identifies a mangled code block, e.g. `//@`
    pub code_signatures: Vec<String>,
}

impl Default for CleanerProfile {
    fn default() -> Self {
        Self {
            on_page_markers: vec!["on this page".to_string()],
            footer_marker: "Copyright".to_string(),
            pager_prefixes: vec!["Previous".to_string(), "Next".to_string()],
            copy_markers: vec!["Copied".to_string()],
            social_phrases: [
                "Pine Q&A chat",
                "Stack Overflow",
                "Telegram",
                "Reddit",
                "Discord",
                "Facebook",
                "Twitter",
                "YouTube",
                "LinkedIn",
                "↗",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            code_signatures: Vec::new(),
        }
    }
}

/// Compiled cleaner for one source
#[derive(Debug, Clone)]
pub struct MarkdownCleaner {
    profile: CleanerProfile,
    on_page_markers: Vec<String>,
    code_fence: String,
}

impl MarkdownCleaner {
    pub fn new(profile: &CleanerProfile, code_language: Option<&str>) -> Self {
        Self {
            profile: profile.clone(),
            on_page_markers: profile
                .on_page_markers
                .iter()
                .map(|m| m.to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
            code_fence: format!("```{}", code_language.unwrap_or_default()),
        }
    }

    /// Runs every cleaning step over converted markdown
    pub fn clean(&self, markdown: &str) -> String {
        let without_links = LINK_RE.replace_all(markdown, "$1");
        let without_urls = BARE_URL_RE.replace_all(&without_links, "");

        let lines = self.filter_lines(&without_urls);
        let repaired = self.repair_fences(lines);

        collapse_blank_lines(&repaired.join("\n")).trim().to_string()
    }

    fn filter_lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let lines: Vec<&str> = text
            .lines()
            .filter(|line| !self.is_on_page_marker(line))
            .collect();

        // Menus precede the article title; pages without one are kept whole
        let start = lines
            .iter()
            .position(|line| line.starts_with("# "))
            .unwrap_or(0);

        let mut kept = Vec::new();
        for line in &lines[start..] {
            if !self.profile.footer_marker.is_empty() && line.contains(&self.profile.footer_marker) {
                break;
            }

            let stripped = line.trim();
            if self.is_noise(stripped) {
                continue;
            }
            kept.push(*line);
        }
        kept
    }

    fn is_on_page_marker(&self, line: &str) -> bool {
        if self.on_page_markers.is_empty() {
            return false;
        }
        let lowered = line.to_lowercase();
        self.on_page_markers.iter().any(|m| lowered.contains(m))
    }

    fn is_noise(&self, stripped: &str) -> bool {
        self.profile
            .pager_prefixes
            .iter()
            .any(|p| !p.is_empty() && stripped.starts_with(p.as_str()))
            || self.profile.copy_markers.iter().any(|m| stripped == m)
            || self
                .profile
                .social_phrases
                .iter()
                .any(|p| !p.is_empty() && stripped.contains(p.as_str()))
    }

    /// Turns `` `code ... ` `` spans that open with a code signature into fenced blocks
    fn repair_fences(&self, lines: Vec<&str>) -> Vec<String> {
        let mut out = Vec::with_capacity(lines.len());
        let mut in_code = false;

        for line in lines {
            let stripped = line.trim();

            if !in_code && stripped.starts_with('`') && !stripped.starts_with("```") {
                let rest = &stripped[1..];
                if self.is_code_start(rest) {
                    in_code = true;
                    out.push(self.code_fence.clone());
                    if let Some(code) = rest.strip_suffix('`') {
                        // Single-line span
                        out.push(code.to_string());
                        out.push("```".to_string());
                        in_code = false;
                    } else {
                        out.push(rest.to_string());
                    }
                    continue;
                }
            }

            if in_code && stripped == "`" {
                in_code = false;
                out.push("```".to_string());
                continue;
            }

            if in_code && stripped.ends_with('`') && !stripped.ends_with("```") {
                in_code = false;
                out.push(stripped[..stripped.len() - 1].to_string());
                out.push("```".to_string());
                continue;
            }

            out.push(line.to_string());
        }

        out
    }

    fn is_code_start(&self, text: &str) -> bool {
        self.profile
            .code_signatures
            .iter()
            .any(|sig| !sig.is_empty() && text.starts_with(sig.as_str()))
    }
}
