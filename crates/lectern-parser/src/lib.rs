//! Lectern Parser Library
//!
//! Turns markdown source files into indexed [`Document`]s: header metadata,
//! markup-stripped plain text and reading time.

pub mod markdown;

use std::path::Path;

use lectern_core::{ContentPath, Document, DocumentKind};
pub use markdown::{MarkdownParser, ParsedMarkdown, reading_time, strip_markdown};
/// Builds [`Document`]s from markdown source.
///
/// Tags, author, reading time and the course card fields are only taken from
/// a course entry file; sibling course files and other kinds contribute a
/// title and body.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentParser {
    markdown: MarkdownParser,
}

impl DocumentParser {
    /// Create a new document parser.
    pub fn new() -> Self {
        Self {
            markdown: MarkdownParser::new(),
        }
    }

    /// Parse a source file into a document.
    ///
    /// A malformed header is logged and treated as absent.
    pub fn parse(&self, source: &str, content_path: &ContentPath, path: &Path) -> Document {
        let parsed = self.markdown.parse_lenient(source, path);
        build_document(parsed, content_path)
    }
}

fn build_document(parsed: ParsedMarkdown, content_path: &ContentPath) -> Document {
    let reading_time = parsed.reading_time();
    let ParsedMarkdown {
        frontmatter,
        plain_text,
        ..
    } = parsed;

    let title = frontmatter
        .title
        .clone()
        .unwrap_or_else(|| content_path.slug.clone());

    let mut doc = Document {
        id: content_path.id.clone(),
        title,
        slug: content_path.slug.clone(),
        url: content_path.url.clone(),
        kind: content_path.kind,
        plain_text,
        tags: Vec::new(),
        author: None,
        reading_time: None,
        description: None,
        lang: None,
        domain: None,
        is_course_entry: content_path.is_course_entry,
    };

    if content_path.kind == DocumentKind::Course && content_path.is_course_entry {
        doc.tags = frontmatter.tags;
        doc.author = frontmatter.author;
        doc.reading_time = Some(reading_time);
        doc.description = frontmatter.description;
        doc.lang = frontmatter.lang;
        doc.domain = frontmatter.domain;
    }

    doc
}
