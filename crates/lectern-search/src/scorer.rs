//! Field-weighted relevance scoring.
//!
//! Matching is raw substring counting on lowercased text, not token matching:
//! "net" occurs twice in "network networking". Changing that alters ranking.

use lectern_core::Document;

/// Title contains the word at all.
pub const TITLE_PRESENT: u32 = 5;
/// Each occurrence of the word in the title.
pub const TITLE_OCCURRENCE: u32 = 10;
/// Body contains the word at all.
pub const BODY_PRESENT: u32 = 1;
/// Each occurrence of the word in the body.
pub const BODY_OCCURRENCE: u32 = 2;
/// A tag equals the word.
pub const TAG_EXACT: u32 = 120;
/// A tag contains the word.
pub const TAG_PARTIAL: u32 = 40;
/// The author equals the word.
pub const AUTHOR_EXACT: u32 = 100;
/// The author contains the word.
pub const AUTHOR_PARTIAL: u32 = 50;
/// Flat bonus for course documents.
pub const COURSE_BONUS: u32 = 1;

/// Split a query into lowercase whitespace-separated words.
pub fn query_words(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score a document against a query.
///
/// Only course documents are scored; everything else is 0, as is an empty query.
pub fn score(query: &str, doc: &Document) -> u32 {
    score_words(&query_words(query), doc)
}

/// Score a document against pre-split lowercase query words.
pub fn score_words(words: &[String], doc: &Document) -> u32 {
    if words.is_empty() || !doc.is_course() {
        return 0;
    }

    let title = doc.title.to_lowercase();
    let body = doc.plain_text.to_lowercase();
    let tags: Vec<String> = doc.tags.iter().map(|t| t.to_lowercase()).collect();
    let author = doc.author.as_deref().map(str::to_lowercase);

    let mut total: u32 = 0;
    for word in words {
        total = total
            .saturating_add(text_score(&title, word, TITLE_PRESENT, TITLE_OCCURRENCE))
            .saturating_add(text_score(&body, word, BODY_PRESENT, BODY_OCCURRENCE))
            .saturating_add(tag_score(&tags, word))
            .saturating_add(author_score(author.as_deref(), word));
    }

    total.saturating_add(COURSE_BONUS)
}

fn text_score(haystack: &str, word: &str, present: u32, per_occurrence: u32) -> u32 {
    let occurrences = u32::try_from(haystack.matches(word).count()).unwrap_or(u32::MAX);
    if occurrences == 0 {
        return 0;
    }
    present.saturating_add(occurrences.saturating_mul(per_occurrence))
}

fn tag_score(tags: &[String], word: &str) -> u32 {
    if tags.iter().any(|t| t == word) {
        TAG_EXACT
    } else if tags.iter().any(|t| t.contains(word)) {
        TAG_PARTIAL
    } else {
        0
    }
}

fn author_score(author: Option<&str>, word: &str) -> u32 {
    match author {
        Some(a) if a == word => AUTHOR_EXACT,
        Some(a) if a.contains(word) => AUTHOR_PARTIAL,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use lectern_core::DocumentKind;

    use super::*;

    fn course(title: &str, body: &str, tags: &[&str], author: Option<&str>) -> Document {
        Document {
            id: format!("blog/{title}/course.md"),
            title: title.to_string(),
            slug: title.to_string(),
            url: format!("/b/{title}"),
            kind: DocumentKind::Course,
            plain_text: body.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            author: author.map(str::to_string),
            reading_time: Some(1),
            description: None,
            lang: None,
            domain: None,
            is_course_entry: true,
        }
    }

    #[test]
    fn test_query_words() {
        assert_eq!(query_words("  Networking   BASICS "), vec!["networking", "basics"]);
        assert!(query_words("   ").is_empty());
    }

    #[test]
    fn test_title_scoring_counts_substrings() {
        let doc = course("Network networking", "", &[], None);
        // 5 for presence + 2 occurrences * 10, plus course bonus.
        assert_eq!(score("net", &doc), 5 + 20 + COURSE_BONUS);
    }

    #[test]
    fn test_body_scoring() {
        let doc = course("x", "linux linux linux", &[], None);
        assert_eq!(score("linux", &doc), 1 + 3 * 2 + COURSE_BONUS);
    }

    #[test]
    fn test_tag_exact_beats_partial() {
        let exact = course("a", "", &["Linux"], None);
        let partial = course("b", "", &["linux-admin"], None);
        assert_eq!(score("linux", &exact), TAG_EXACT + COURSE_BONUS);
        assert_eq!(score("linux", &partial), TAG_PARTIAL + COURSE_BONUS);
    }

    #[test]
    fn test_tag_exact_counts_once_per_word() {
        let doc = course("a", "", &["linux", "Linux Admin", "linux"], None);
        assert_eq!(score("linux", &doc), TAG_EXACT + COURSE_BONUS);
    }

    #[test]
    fn test_author_scoring() {
        let doc = course("a", "", &[], Some("Alice Martin"));
        assert_eq!(score("alice", &doc), AUTHOR_PARTIAL + COURSE_BONUS);

        let doc = course("a", "", &[], Some("Alice"));
        assert_eq!(score("ALICE", &doc), AUTHOR_EXACT + COURSE_BONUS);
    }

    #[test]
    fn test_multiple_words_add_up() {
        let doc = course("Networking Basics", "networking", &[], None);
        let expected = (5 + 10) + (1 + 2) + (5 + 10) + COURSE_BONUS;
        assert_eq!(score("networking basics", &doc), expected);
    }

    #[test]
    fn test_non_course_documents_score_zero() {
        let mut doc = course("Linux", "linux", &["linux"], None);
        doc.kind = DocumentKind::Resource;
        assert_eq!(score("linux", &doc), 0);
        doc.kind = DocumentKind::Generic;
        assert_eq!(score("linux", &doc), 0);
    }

    #[test]
    fn test_empty_query_scores_zero() {
        let doc = course("Linux", "linux", &[], None);
        assert_eq!(score("", &doc), 0);
        assert_eq!(score("   ", &doc), 0);
    }

    #[test]
    fn test_unmatched_course_keeps_bonus() {
        let doc = course("Linux", "shell", &[], None);
        assert_eq!(score("kubernetes", &doc), COURSE_BONUS);
    }
}
