//! Frontmatter parsing for content files.
//!
//! Headers are loosely typed in the wild: `tags` may be a list or a
//! comma-separated string, and the author may be given as `authors` or
//! `author`, either as a string or as a list. Everything is normalized once
//! here into a single typed [`Frontmatter`] record.

use std::path::Path;

use serde::{Deserialize, Serialize, de::IgnoredAny};

use crate::error::{CoreError, Result};

/// Normalized frontmatter metadata for a content file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Display title, trimmed, `None` when absent or blank.
    #[serde(default)]
    pub title: Option<String>,

    /// Short description used on course cards.
    #[serde(default)]
    pub description: Option<String>,

    /// Language code as written in the header.
    #[serde(default)]
    pub lang: Option<String>,

    /// Subject domain (e.g. "DevOps").
    #[serde(default)]
    pub domain: Option<String>,

    /// Tags in insertion order, trimmed and deduplicated.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Single canonical author.
    #[serde(default)]
    pub author: Option<String>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// A header value before normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<FieldValue>),
    Other(IgnoredAny),
}

impl FieldValue {
    /// Only genuine strings count as text fields.
    fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar rendering used for list elements (`[linux, 2024]`).
    fn to_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::List(_) | Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontmatter {
    #[serde(default)]
    title: Option<FieldValue>,
    #[serde(default)]
    description: Option<FieldValue>,
    #[serde(default)]
    lang: Option<FieldValue>,
    #[serde(default)]
    domain: Option<FieldValue>,
    #[serde(default)]
    tags: Option<FieldValue>,
    #[serde(default)]
    authors: Option<FieldValue>,
    #[serde(default)]
    author: Option<FieldValue>,
}

impl From<RawFrontmatter> for Frontmatter {
    fn from(raw: RawFrontmatter) -> Self {
        let author = raw
            .authors
            .as_ref()
            .and_then(normalize_author)
            .or_else(|| raw.author.as_ref().and_then(normalize_author));

        Self {
            title: text_field(raw.title.as_ref()),
            description: text_field(raw.description.as_ref()),
            lang: text_field(raw.lang.as_ref()),
            domain: text_field(raw.domain.as_ref()),
            tags: raw.tags.as_ref().map(normalize_tags).unwrap_or_default(),
            author,
        }
    }
}

fn text_field(value: Option<&FieldValue>) -> Option<String> {
    value
        .and_then(FieldValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `authors: Alice` and `authors: [Alice, Bob]` both resolve to "Alice".
fn normalize_author(value: &FieldValue) -> Option<String> {
    let name = match value {
        FieldValue::Text(s) => s.as_str(),
        FieldValue::List(items) => items.first()?.as_str()?,
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn normalize_tags(value: &FieldValue) -> Vec<String> {
    let candidates: Vec<String> = match value {
        FieldValue::Text(s) => s.split(',').map(str::to_string).collect(),
        FieldValue::List(items) => items.iter().filter_map(FieldValue::to_text).collect(),
        _ => Vec::new(),
    };

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Split content into frontmatter and body.
///
/// The closing delimiter must start a line.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];
    let closing = format!("\n{delimiter}");
    let closing_pos = after_first.find(&closing)?;

    let frontmatter = after_first[..closing_pos].trim();
    let rest = &after_first[closing_pos + closing.len()..];
    // Drop the remainder of the closing delimiter line.
    let body = rest.find('\n').map_or("", |nl| &rest[nl + 1..]);

    Some((format, frontmatter, body.trim_start()))
}

/// Parse frontmatter from a string.
///
/// Content without a header yields the default frontmatter and the full
/// content as body. A malformed header is an error.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let raw: RawFrontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
    };

    Ok((raw.into(), body.to_string()))
}

/// Parse frontmatter, treating a malformed header as "no metadata".
///
/// The body after the header is still returned so the document stays
/// searchable.
pub fn parse_frontmatter_lenient(content: &str, path: &Path) -> (Frontmatter, String) {
    match parse_frontmatter(content, path) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable frontmatter");
            let body = split_frontmatter(content).map_or(content, |(_, _, body)| body);
            (Frontmatter::default(), body.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: "Intro to LPIC"
tags: [linux]
---

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = r#"+++
title = "Intro to LPIC"
+++

This is the body content."#;

        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert!(fm.contains("title ="));
        assert!(body.starts_with("This is the body"));
    }

    #[test]
    fn test_split_ignores_inline_dashes() {
        let content = "---\ntitle: a---b\n---\nBody";
        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: a---b");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "Just some content without frontmatter.";
        assert!(split_frontmatter(content).is_none());

        let (fm, body) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_tags_as_list() {
        let content = "---\ntitle: Test\ntags:\n  - linux\n  - certification\n---\nBody";
        let (fm, body) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm.title.as_deref(), Some("Test"));
        assert_eq!(fm.tags, vec!["linux", "certification"]);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_tags_as_comma_string() {
        let content = "---\ntags: linux, certification , ,linux\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm.tags, vec!["linux", "certification"]);
    }

    #[test]
    fn test_numeric_tags_are_stringified() {
        let content = "---\ntags: [kubernetes, 2024]\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm.tags, vec!["kubernetes", "2024"]);
    }

    #[test]
    fn test_author_string_and_list_forms() {
        let single = "---\nauthors: Alice\n---\n";
        let (fm, _) = parse_frontmatter(single, Path::new("a.md")).expect("parse");
        assert_eq!(fm.author.as_deref(), Some("Alice"));

        let list = "---\nauthors: [Bob, Carol]\n---\n";
        let (fm, _) = parse_frontmatter(list, Path::new("a.md")).expect("parse");
        assert_eq!(fm.author.as_deref(), Some("Bob"));

        let singular_key = "---\nauthor: Dave\n---\n";
        let (fm, _) = parse_frontmatter(singular_key, Path::new("a.md")).expect("parse");
        assert_eq!(fm.author.as_deref(), Some("Dave"));
    }

    #[test]
    fn test_non_string_title_is_ignored() {
        let content = "---\ntitle: 42\nlang: fr\ndomain: DevOps\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert!(fm.title.is_none());
        assert_eq!(fm.lang.as_deref(), Some("fr"));
        assert_eq!(fm.domain.as_deref(), Some("DevOps"));
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "Test Post"
tags = ["rust", "test"]
authors = "Alice"
+++

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("test.md")).expect("parse");
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tags, vec!["rust", "test"]);
        assert_eq!(fm.author.as_deref(), Some("Alice"));
        assert_eq!(body, "Content here.");
    }

    #[test]
    fn test_malformed_header_is_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        assert!(parse_frontmatter(content, Path::new("bad.md")).is_err());
    }

    #[test]
    fn test_lenient_keeps_body() {
        let content = "---\ntitle: [unclosed\n---\nStill searchable";
        let (fm, body) = parse_frontmatter_lenient(content, Path::new("bad.md"));
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, "Still searchable");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let content = "---\ntitle: Test\nslides: true\nextra:\n  nested: 1\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm.title.as_deref(), Some("Test"));
    }
}
