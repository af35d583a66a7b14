//! Markdown parsing: frontmatter split, markup stripping and reading time.

use std::{path::Path, sync::LazyLock};

use lectern_core::frontmatter::{Frontmatter, parse_frontmatter_lenient};
use regex::Regex;

/// Words per minute used for reading time estimates.
pub const WORDS_PER_MINUTE: usize = 60;

static FENCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("valid fenced code regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]*`").expect("valid inline code regex"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("valid image regex"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s{0,3}#{1,6}\s+").expect("valid heading regex"));
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[>*_~`#|-]").expect("valid punctuation regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid html tag regex"));

/// A markdown file split into metadata, raw body and plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarkdown {
    /// Normalized header metadata.
    pub frontmatter: Frontmatter,

    /// Raw markdown body without the header.
    pub body: String,

    /// Markup-stripped, whitespace-collapsed body.
    pub plain_text: String,
}

impl ParsedMarkdown {
    /// Reading time of the body in minutes.
    pub fn reading_time(&self) -> u32 {
        reading_time(&self.body)
    }
}

/// Markdown parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownParser;

impl MarkdownParser {
    /// Create a new markdown parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse markdown content, treating a malformed header as no metadata.
    pub fn parse_lenient(&self, content: &str, path: &Path) -> ParsedMarkdown {
        let (frontmatter, body) = parse_frontmatter_lenient(content, path);
        Self::assemble(frontmatter, body)
    }

    fn assemble(frontmatter: Frontmatter, body: String) -> ParsedMarkdown {
        let plain_text = strip_markdown(&body);
        ParsedMarkdown {
            frontmatter,
            body,
            plain_text,
        }
    }
}

/// Strip markdown syntax down to plain text.
///
/// Removal order matters: fenced code, inline code, images, links (keeping
/// their text), heading markers, then residual emphasis/list/quote/table
/// punctuation. Whitespace runs collapse to one space.
pub fn strip_markdown(markdown: &str) -> String {
    let text = FENCED_CODE.replace_all(markdown, " ");
    let text = INLINE_CODE.replace_all(&text, " ");
    let text = IMAGE.replace_all(&text, " ");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Count whitespace-separated words after removing HTML tags.
pub fn word_count(body: &str) -> usize {
    HTML_TAG.replace_all(body, " ").split_whitespace().count()
}

/// Estimated reading time in minutes, never less than one.
pub fn reading_time(body: &str) -> u32 {
    let minutes = word_count(body).div_ceil(WORDS_PER_MINUTE).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_strip_fenced_code() {
        let md = "Before\n```bash\nrm -rf /\n```\nAfter";
        assert_eq!(strip_markdown(md), "Before After");
    }

    #[test]
    fn test_strip_inline_code_and_images() {
        let md = "Run `ls -la` then look at ![diagram](img/arch.png) here";
        assert_eq!(strip_markdown(md), "Run then look at here");
    }

    #[test]
    fn test_links_keep_display_text() {
        let md = "See [the docs](https://example.com/docs) for more";
        assert_eq!(strip_markdown(md), "See the docs for more");
    }

    #[test]
    fn test_headings_and_emphasis() {
        let md = "# Title\n\n## Sub *title*\n\n> quoted **bold** ~~gone~~\n\n- item one\n| a | b |";
        assert_eq!(
            strip_markdown(md),
            "Title Sub title quoted bold gone item one a b"
        );
    }

    #[test]
    fn test_substring_hyphens_removed() {
        assert_eq!(strip_markdown("well-known"), "well known");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_markdown(""), "");
        assert_eq!(strip_markdown("   \n\t "), "");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time(&"word ".repeat(60)), 1);
        assert_eq!(reading_time(&"word ".repeat(61)), 2);
        assert_eq!(reading_time(&"<p>word</p> ".repeat(120)), 2);
    }

    #[test]
    fn test_word_count_strips_tags() {
        assert_eq!(word_count("<div class=\"x\">one two</div>three"), 3);
    }

    #[test]
    fn test_parse_with_frontmatter() {
        let content = "---\ntitle: Intro to LPIC\ntags: [linux]\n---\n# Heading\nBody `code`";
        let parsed = MarkdownParser::new().parse_lenient(content, Path::new("course.md"));
        assert_eq!(parsed.frontmatter.title.as_deref(), Some("Intro to LPIC"));
        assert_eq!(parsed.plain_text, "Heading Body");
        assert_eq!(parsed.reading_time(), 1);
    }

    #[test]
    fn test_bad_header_is_dropped() {
        let content = "---\ntags: [oops\n---\nBody";
        let lenient = MarkdownParser::new().parse_lenient(content, Path::new("x.md"));
        assert_eq!(lenient.plain_text, "Body");
        assert!(lenient.frontmatter.tags.is_empty());
    }

    proptest! {
        #[test]
        fn prop_stripped_text_has_no_markup(
            words in proptest::collection::vec("[a-z]{1,8}", 1..20),
            url in "[a-z]{1,10}",
        ) {
            let text = words.join(" ");
            let md = format!(
                "# {text}\n```\ncode {text}\n```\n[{text}](http://{url}) ![{text}](/{url}.png) `x` *{text}*"
            );
            let plain = strip_markdown(&md);
            prop_assert!(!plain.contains("```"));
            prop_assert!(!plain.contains("!["));
            prop_assert!(!plain.contains("]("));
            prop_assert!(!plain.contains('#'));
            prop_assert!(!plain.contains("  "));
            prop_assert_eq!(plain.trim(), plain.as_str());
        }
    }
}
