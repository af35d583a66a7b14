//! Filtering and cursor pagination.

use lectern_core::{CourseMeta, Lang};
use serde::{Deserialize, Serialize};

/// Anything carrying the faceted attributes a filter inspects.
pub trait Faceted {
    fn lang(&self) -> Option<&str>;
    fn domain(&self) -> Option<&str>;
    fn author(&self) -> Option<&str>;
    fn tags(&self) -> &[String];
}

impl Faceted for CourseMeta {
    fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Filter criteria. Empty lists impose no constraint.
///
/// Tags match if the item has any of them; the groups combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub lang: Option<Lang>,
    pub domains: Vec<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

impl FilterOptions {
    /// Whether an item satisfies every criterion.
    pub fn matches<T: Faceted + ?Sized>(&self, item: &T) -> bool {
        if let Some(lang) = self.lang
            && !lang.matches(item.lang())
        {
            return false;
        }

        if !self.domains.is_empty() && !item.domain().is_some_and(|d| contains(&self.domains, d)) {
            return false;
        }

        if !self.authors.is_empty() && !item.author().is_some_and(|a| contains(&self.authors, a)) {
            return false;
        }

        if !self.tags.is_empty() && !item.tags().iter().any(|t| contains(&self.tags, t)) {
            return false;
        }

        true
    }

    /// Whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.lang.is_none() && self.domains.is_empty() && self.authors.is_empty() && self.tags.is_empty()
    }
}

fn contains(list: &[String], value: &str) -> bool {
    list.iter().any(|v| v == value)
}

/// Keep the items matching `options`, in order.
pub fn filter<T: Faceted + Clone>(items: &[T], options: &FilterOptions) -> Vec<T> {
    items.iter().filter(|i| options.matches(*i)).cloned().collect()
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Offset of the next page; absent on the last page.
    pub next_cursor: Option<usize>,
    /// Number of items across all pages.
    pub total: usize,
}

/// Slice `items` at an offset.
///
/// A cursor past the end of a non-empty list restarts at 0. `limit` must
/// already be clamped; 0 is treated as 1.
pub fn paginate<T>(items: Vec<T>, cursor: usize, limit: usize) -> Page<T> {
    let total = items.len();
    let limit = limit.max(1);
    let cursor = if cursor >= total { 0 } else { cursor };
    let end = cursor.saturating_add(limit).min(total);

    let items: Vec<T> = items.into_iter().skip(cursor).take(end - cursor).collect();
    let next_cursor = (end < total).then_some(end);

    Page {
        items,
        next_cursor,
        total,
    }
}

/// Normalize a raw cursor: negative values become 0.
pub fn normalize_cursor(raw: Option<i64>) -> usize {
    raw.and_then(|c| usize::try_from(c).ok()).unwrap_or(0)
}
