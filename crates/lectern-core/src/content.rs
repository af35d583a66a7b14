//! Content types and structures.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::config::ContentConfig;

/// Kind of an indexed document, derived from its location in the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A file inside a course directory (`blog/<slug>/...`).
    Course,
    /// A standalone resource page (`res/<slug>.md`).
    Resource,
    /// Anything else in the tree.
    Generic,
}

impl DocumentKind {
    /// Lowercase name used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Resource => "resource",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported content languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English, also assumed for documents without an explicit language.
    #[default]
    En,
    /// French.
    Fr,
}

impl Lang {
    /// ISO 639-1 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    /// Whether a document language (as written in its header) is this language.
    ///
    /// A document without a language is English.
    pub fn matches(&self, doc_lang: Option<&str>) -> bool {
        doc_lang
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(Self::En.code())
            .eq_ignore_ascii_case(self.code())
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Location of a content file, classified into kind, slug and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Relative path with forward slashes; the document id.
    pub id: String,

    /// Document kind derived from the path layout.
    pub kind: DocumentKind,

    /// Short identifier used to build the URL.
    pub slug: String,

    /// Canonical URL of the rendered page.
    pub url: String,

    /// Whether this file is the entry file of a course (`course.md`), the
    /// only file that contributes course metadata.
    pub is_course_entry: bool,
}

impl ContentPath {
    /// Classify a path relative to the content root.
    ///
    /// - `blog/lpic1/course.md` → course `lpic1`, url `/b/lpic1`
    /// - `blog/lpic1/slides.md` → course `lpic1`, url `/b/lpic1`
    /// - `res/cheatsheet.md` → resource `cheatsheet`, url `/res/cheatsheet`
    /// - `guides/setup.md` → generic `guides/setup`, url `/`
    ///
    /// Returns `None` for non-markdown files.
    pub fn from_path(relative: &Path, layout: &ContentConfig) -> Option<Self> {
        if !is_markdown(relative) {
            return None;
        }

        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            return None;
        }
        let id = parts.join("/");

        let (kind, slug, url) = if parts[0] == layout.course_dir && parts.len() >= 3 {
            let slug = parts[1].clone();
            let url = join_url(&layout.course_url_prefix, &slug);
            (DocumentKind::Course, slug, url)
        } else if parts[0] == layout.resource_dir && parts.len() == 2 {
            let slug = strip_md_suffix(&parts[1]).to_string();
            let url = join_url(&layout.resource_url_prefix, &slug);
            (DocumentKind::Resource, slug, url)
        } else {
            (
                DocumentKind::Generic,
                strip_md_suffix(&id).to_string(),
                "/".to_string(),
            )
        };

        let is_course_entry = kind == DocumentKind::Course
            && parts.len() == 3
            && parts[2] == layout.course_file;

        Some(Self {
            id,
            kind,
            slug,
            url,
            is_course_entry,
        })
    }
}

/// Whether a path names a markdown file (`.md`, any case).
pub fn is_markdown(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase().ends_with(".md"))
        .unwrap_or(false)
}

fn strip_md_suffix(name: &str) -> &str {
    let len = name.len();
    if len >= 3 && name[len - 3..].eq_ignore_ascii_case(".md") {
        &name[..len - 3]
    } else {
        name
    }
}

fn join_url(prefix: &str, slug: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), slug)
}

/// A unit of indexed content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Source path relative to the content root, unique across the index.
    pub id: String,

    /// Display title; the slug when the header has none.
    pub title: String,

    /// Short identifier used to build the URL.
    pub slug: String,

    /// Canonical URL of the rendered page.
    pub url: String,

    /// Document kind.
    pub kind: DocumentKind,

    /// Markup-stripped, whitespace-collapsed body.
    pub plain_text: String,

    /// Tags in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Single canonical author.
    #[serde(default)]
    pub author: Option<String>,

    /// Estimated reading time in minutes, at least 1.
    #[serde(default)]
    pub reading_time: Option<u32>,

    /// Course description.
    #[serde(default)]
    pub description: Option<String>,

    /// Language code as written in the header.
    #[serde(default)]
    pub lang: Option<String>,

    /// Subject domain.
    #[serde(default)]
    pub domain: Option<String>,

    /// Whether this is a course entry file.
    #[serde(default)]
    pub is_course_entry: bool,
}

impl Document {
    /// Whether this document is a course page.
    pub fn is_course(&self) -> bool {
        self.kind == DocumentKind::Course
    }

    /// Case-insensitive exact tag membership.
    pub fn has_tag_ignore_case(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Lightweight per-course record used by the facet catalog and filtered browsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseMeta {
    /// Course slug.
    pub slug: String,

    /// Title from the course header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Description from the course header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Language code from the course header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Tags from the course header.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Author from the course header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Domain from the course header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl CourseMeta {
    /// A course with no readable entry file.
    pub fn bare(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            description: None,
            lang: None,
            tags: Vec::new(),
            author: None,
            domain: None,
        }
    }
}

impl From<&Document> for CourseMeta {
    fn from(doc: &Document) -> Self {
        Self {
            slug: doc.slug.clone(),
            title: Some(doc.title.clone()),
            description: doc.description.clone(),
            lang: doc.lang.clone(),
            tags: doc.tags.clone(),
            author: doc.author.clone(),
            domain: doc.domain.clone(),
        }
    }
}
