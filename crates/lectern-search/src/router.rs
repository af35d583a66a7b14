//! Exact-match routing.
//!
//! A query that names an author, or contains a word equal to a tag, bypasses
//! scoring: the matching courses come back at a fixed score. Authors take
//! precedence over tags.

use lectern_core::Document;

use crate::scorer::query_words;

/// Which exact-match path fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPath {
    /// The whole query equals an author.
    Author,
    /// A query word equals a tag.
    Tag,
}

/// Documents selected by an exact match, ordered by id.
#[derive(Debug, Clone)]
pub struct ExactMatch<'a> {
    pub path: MatchPath,
    pub documents: Vec<&'a Document>,
}

/// Route a query through the exact-match paths.
///
/// Only `documents` are considered, so callers narrow the candidates (by
/// language, say) before routing. Returns `None` when neither path applies and
/// the query should be scored.
pub fn route<'a>(documents: &[&'a Document], query: &str) -> Option<ExactMatch<'a>> {
    author_match(documents, query).or_else(|| tag_match(documents, query))
}

fn author_match<'a>(documents: &[&'a Document], query: &str) -> Option<ExactMatch<'a>> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    let matches = collect(documents, |doc| {
        doc.author
            .as_deref()
            .is_some_and(|a| a.trim().to_lowercase() == needle)
    });
    (!matches.is_empty()).then_some(ExactMatch {
        path: MatchPath::Author,
        documents: matches,
    })
}

fn tag_match<'a>(documents: &[&'a Document], query: &str) -> Option<ExactMatch<'a>> {
    let words = query_words(query);
    if words.is_empty() {
        return None;
    }

    let matches = collect(documents, |doc| words.iter().any(|w| doc.has_tag_ignore_case(w)));
    (!matches.is_empty()).then_some(ExactMatch {
        path: MatchPath::Tag,
        documents: matches,
    })
}

fn collect<'a>(documents: &[&'a Document], pred: impl Fn(&Document) -> bool) -> Vec<&'a Document> {
    let mut matches: Vec<&'a Document> = documents
        .iter()
        .copied()
        .filter(|d| d.is_course() && pred(d))
        .collect();
    matches.sort_by(|a, b| a.id.cmp(&b.id));
    matches
}

#[cfg(test)]
mod tests {
    use lectern_core::DocumentKind;

    use super::*;

    fn doc(id: &str, kind: DocumentKind, tags: &[&str], author: Option<&str>) -> Document {
        Document {
            id: id.to_string(),
            title: id.to_string(),
            slug: id.to_string(),
            url: format!("/b/{id}"),
            kind,
            plain_text: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: author.map(str::to_string),
            reading_time: None,
            description: None,
            lang: None,
            domain: None,
            is_course_entry: true,
        }
    }

    fn refs(docs: &[Document]) -> Vec<&Document> {
        docs.iter().collect()
    }

    fn ids(m: &ExactMatch<'_>) -> Vec<String> {
        m.documents.iter().map(|d| d.id.clone()).collect()
    }

    #[test]
    fn test_author_path() {
        let docs = vec![
            doc("c", DocumentKind::Course, &[], Some("Alice Martin")),
            doc("a", DocumentKind::Course, &[], Some("alice martin")),
            doc("b", DocumentKind::Course, &[], Some("Bob")),
        ];
        let m = route(&refs(&docs), "  ALICE MARTIN ").expect("author match");
        assert_eq!(m.path, MatchPath::Author);
        assert_eq!(ids(&m), vec!["a", "c"]);
    }

    #[test]
    fn test_partial_author_is_not_exact() {
        let docs = vec![doc("a", DocumentKind::Course, &[], Some("Alice Martin"))];
        assert!(route(&refs(&docs), "alice").is_none());
    }

    #[test]
    fn test_tag_path() {
        let docs = vec![
            doc("a", DocumentKind::Course, &["Linux"], None),
            doc("b", DocumentKind::Course, &["kubernetes"], None),
            doc("c", DocumentKind::Course, &["linux-admin"], None),
        ];
        let m = route(&refs(&docs), "learn linux").expect("tag match");
        assert_eq!(m.path, MatchPath::Tag);
        assert_eq!(ids(&m), vec!["a"]);
    }

    #[test]
    fn test_author_takes_precedence_over_tag() {
        let docs = vec![
            doc("a", DocumentKind::Course, &["bob"], None),
            doc("b", DocumentKind::Course, &[], Some("Bob")),
        ];
        let m = route(&refs(&docs), "bob").expect("match");
        assert_eq!(m.path, MatchPath::Author);
        assert_eq!(ids(&m), vec!["b"]);
    }

    #[test]
    fn test_non_course_documents_are_never_routed() {
        let docs = vec![doc("r", DocumentKind::Resource, &["linux"], Some("Alice"))];
        assert!(route(&refs(&docs), "linux").is_none());
        assert!(route(&refs(&docs), "alice").is_none());
    }

    #[test]
    fn test_only_candidates_are_routed() {
        let docs = vec![
            doc("en", DocumentKind::Course, &["linux"], None),
            doc("fr", DocumentKind::Course, &[], None),
        ];
        assert!(route(&[&docs[1]], "linux").is_none());
        assert_eq!(ids(&route(&[&docs[0]], "linux").expect("tag match")), vec!["en"]);
    }

    #[test]
    fn test_no_match_falls_through() {
        let docs = vec![doc("a", DocumentKind::Course, &["linux"], Some("Alice"))];
        assert!(route(&refs(&docs), "networking").is_none());
        assert!(route(&refs(&docs), "   ").is_none());
    }
}
