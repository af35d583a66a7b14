//! Facet catalog: the distinct tags, authors and domains across courses.

use std::{cmp::Ordering, collections::HashMap};

use lectern_core::{CourseMeta, Document};
use serde::Serialize;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// All facet values, each sorted and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetCatalog {
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub domains: Vec<String>,
}

impl FacetCatalog {
    /// Build the catalog from course records.
    pub fn from_courses(courses: &[CourseMeta]) -> Self {
        Self {
            tags: distinct(courses.iter().flat_map(|c| c.tags.iter().map(String::as_str))),
            authors: distinct(courses.iter().filter_map(|c| c.author.as_deref())),
            domains: distinct(courses.iter().filter_map(|c| c.domain.as_deref())),
        }
    }
}

/// One record per course slug, in first-seen order.
///
/// Metadata comes from the course entry file; a course without one yields a
/// bare record carrying only its slug.
pub fn course_metas<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Vec<CourseMeta> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut metas: Vec<CourseMeta> = Vec::new();

    for doc in documents.into_iter().filter(|d| d.is_course()) {
        let pos = *positions.entry(doc.slug.as_str()).or_insert_with(|| {
            metas.push(CourseMeta::bare(doc.slug.clone()));
            metas.len() - 1
        });
        if doc.is_course_entry {
            metas[pos] = CourseMeta::from(doc);
        }
    }

    metas
}

/// Trimmed, non-empty, distinct values in locale order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    out.sort_by(|a, b| locale_cmp(a, b));
    out.dedup();
    out
}

/// Compare strings the way a human-facing list sorts them.
///
/// Base letters first, ignoring case and accents; then unaccented before
/// accented; then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| b.cmp(a))
}

fn base_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn accent_key(s: &str) -> String {
    s.nfd().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use lectern_core::DocumentKind;

    use super::*;

    fn doc(id: &str, slug: &str, kind: DocumentKind, entry: bool, tags: &[&str], author: Option<&str>) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            slug: slug.to_string(),
            url: format!("/b/{slug}"),
            kind,
            plain_text: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: author.map(str::to_string),
            reading_time: None,
            description: None,
            lang: None,
            domain: Some("Ops ".to_string()).filter(|_| entry),
            is_course_entry: entry,
        }
    }

    #[test]
    fn test_course_metas_one_per_slug() {
        let docs = vec![
            doc("blog/a/slides.md", "a", DocumentKind::Course, false, &[], None),
            doc("blog/a/course.md", "a", DocumentKind::Course, true, &["linux"], Some("Alice")),
            doc("blog/b/notes.md", "b", DocumentKind::Course, false, &[], None),
            doc("res/x.md", "x", DocumentKind::Resource, false, &["ignored"], None),
        ];
        let metas = course_metas(&docs);

        assert_eq!(metas.len(), 2);
        assert_eq!(metas[0].slug, "a");
        assert_eq!(metas[0].author.as_deref(), Some("Alice"));
        assert_eq!(metas[1], CourseMeta::bare("b"));
    }

    #[test]
    fn test_catalog_distinct_trimmed_sorted() {
        let courses = vec![
            CourseMeta {
                tags: vec!["linux".into(), " Shell ".into(), "".into()],
                author: Some("Zoé".into()),
                domain: Some("DevOps".into()),
                ..CourseMeta::bare("a")
            },
            CourseMeta {
                tags: vec!["Linux".into(), "linux".into(), "éthique".into()],
                author: Some("alice".into()),
                domain: Some("  ".into()),
                ..CourseMeta::bare("b")
            },
        ];

        let catalog = FacetCatalog::from_courses(&courses);
        assert_eq!(catalog.tags, vec!["éthique", "linux", "Linux", "Shell"]);
        assert_eq!(catalog.authors, vec!["alice", "Zoé"]);
        assert_eq!(catalog.domains, vec!["DevOps"]);
    }

    #[test]
    fn test_catalog_excludes_non_course_documents() {
        let docs = vec![
            doc("blog/a/course.md", "a", DocumentKind::Course, true, &["linux"], None),
            doc("res/x.md", "x", DocumentKind::Resource, true, &["resource-only"], Some("Eve")),
        ];
        let catalog = FacetCatalog::from_courses(&course_metas(&docs));
        assert_eq!(catalog.tags, vec!["linux"]);
        assert!(catalog.authors.is_empty());
        assert_eq!(catalog.domains, vec!["Ops"]);
    }

    #[test]
    fn test_locale_cmp() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("e", "é"), Ordering::Less);
        assert_eq!(locale_cmp("é", "f"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }
}
