//! Query entry points over the index store.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use lectern_core::{
    CourseMeta, Document, DocumentKind, Lang,
    config::{Config, SearchConfig},
};
use lectern_index::{DocumentLoader, Index, IndexStats, IndexStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    Result, SearchError,
    facets::{FacetCatalog, course_metas},
    filter::{FilterOptions, Page, filter, normalize_cursor, paginate},
    router,
    scorer::{query_words, score_words},
    snippet::snippet,
};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub kind: DocumentKind,
    pub snippet: String,
    pub score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
}

/// Free-text search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub limit: Option<usize>,
    pub lang: Option<Lang>,
}

/// Search followed by faceted filtering of the hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CardsRequest {
    pub query: String,
    pub limit: Option<usize>,
    /// Defaults to English when absent.
    pub lang: Option<Lang>,
    pub domains: Vec<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

/// Filtered, paginated browse over course records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BrowseRequest {
    #[serde(flatten)]
    pub filter: FilterOptions,
    pub limit: Option<usize>,
    pub cursor: Option<i64>,
}

/// Rank documents for a query.
///
/// With `lang` set, only documents of that language take part; a course file
/// carries the language of its course entry. Exact author or tag matches
/// among those documents short-circuit at `settings.exact_match_score`;
/// otherwise documents are scored, zero scores dropped, and the rest sorted by
/// descending score with ties broken by id. Results are unique by URL (the
/// highest-scoring document wins) and at most `limit` long.
pub fn rank(
    documents: &[Document],
    query: &str,
    limit: usize,
    lang: Option<Lang>,
    settings: &SearchConfig,
) -> Vec<SearchResultItem> {
    let course_langs = course_langs(documents);
    let eligible: Vec<&Document> = documents
        .iter()
        .filter(|d| lang.is_none_or(|l| l.matches(document_lang(d, &course_langs))))
        .collect();

    let ranked: Vec<(&Document, u32)> = match router::route(&eligible, query) {
        Some(exact) => {
            debug!(path = ?exact.path, hits = exact.documents.len(), "exact match");
            exact
                .documents
                .into_iter()
                .map(|d| (d, settings.exact_match_score))
                .collect()
        }
        None => {
            let words = query_words(query);
            let mut scored: Vec<(&Document, u32)> = eligible
                .iter()
                .map(|d| (*d, score_words(&words, d)))
                .filter(|(_, score)| *score > 0)
                .collect();
            scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
            scored
        }
    };

    dedupe_by_url(ranked, limit)
        .into_iter()
        .map(|(doc, score)| SearchResultItem {
            id: doc.id.clone(),
            title: doc.title.clone(),
            url: doc.url.clone(),
            kind: doc.kind,
            snippet: snippet(&doc.plain_text, query, settings.snippet_size),
            score,
            author: doc.author.clone(),
            reading_time: doc.reading_time,
        })
        .collect()
}

/// Language of each course, keyed by slug, as declared by its entry file.
fn course_langs(documents: &[Document]) -> HashMap<&str, Option<&str>> {
    documents
        .iter()
        .filter(|d| d.is_course() && d.is_course_entry)
        .map(|d| (d.slug.as_str(), d.lang.as_deref()))
        .collect()
}

/// Effective language of a document: its course's for course files, its own
/// otherwise.
fn document_lang<'a>(
    doc: &'a Document,
    course_langs: &HashMap<&'a str, Option<&'a str>>,
) -> Option<&'a str> {
    if doc.is_course() {
        course_langs.get(doc.slug.as_str()).copied().flatten()
    } else {
        doc.lang.as_deref()
    }
}

/// Keep the first (highest-ranked) hit per URL, stopping at `limit`.
///
/// Input must already be sorted by descending score.
fn dedupe_by_url<'a>(ranked: Vec<(&'a Document, u32)>, limit: usize) -> Vec<(&'a Document, u32)> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(limit.min(ranked.len()));
    for (doc, score) in ranked {
        if out.len() >= limit {
            break;
        }
        if seen.insert(doc.url.as_str()) {
            out.push((doc, score));
        }
    }
    out
}

/// The search engine: every query entry point, backed by one index store.
#[derive(Debug)]
pub struct SearchEngine {
    store: IndexStore,
    settings: SearchConfig,
}

impl SearchEngine {
    /// Create an engine over an existing store.
    pub fn new(store: IndexStore, settings: SearchConfig) -> Self {
        Self { store, settings }
    }

    /// Create an engine that loads the content tree named in `config`.
    pub fn from_config(config: &Config) -> Self {
        let loader = DocumentLoader::new(config.content.clone());
        let store = IndexStore::new(loader, config.search.build_timeout());
        Self::new(store, config.search.clone())
    }

    /// The backing store.
    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Search settings.
    pub fn settings(&self) -> &SearchConfig {
        &self.settings
    }

    async fn index(&self) -> Result<Arc<Index>> {
        Ok(self.store.get().await?)
    }

    /// Ranked free-text search.
    #[instrument(skip(self), fields(query = %request.query))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResultItem>> {
        let index = self.index().await?;
        let limit = self
            .settings
            .clamp_limit(request.limit, self.settings.default_limit);

        let results = rank(index.documents(), &request.query, limit, request.lang, &self.settings);
        debug!(hits = results.len(), limit, "search complete");
        Ok(results)
    }

    /// Search, then keep hits whose course matches the facet filters.
    ///
    /// Language defaults to English. The limit bounds the search, so fewer than
    /// `limit` cards may come back.
    #[instrument(skip(self), fields(query = %request.query))]
    pub async fn cards(&self, request: &CardsRequest) -> Result<Vec<SearchResultItem>> {
        let index = self.index().await?;
        let limit = self
            .settings
            .clamp_limit(request.limit, self.settings.default_limit);

        let filter = FilterOptions {
            lang: Some(request.lang.unwrap_or_default()),
            domains: request.domains.clone(),
            authors: request.authors.clone(),
            tags: request.tags.clone(),
        };

        let metas: HashMap<String, CourseMeta> = course_metas(index.courses())
            .into_iter()
            .map(|m| (m.slug.clone(), m))
            .collect();

        let cards: Vec<SearchResultItem> = rank(index.documents(), &request.query, limit, None, &self.settings)
            .into_iter()
            .filter(|item| {
                index
                    .get(&item.id)
                    .and_then(|doc| metas.get(&doc.slug))
                    .is_some_and(|meta| filter.matches(meta))
            })
            .collect();

        debug!(cards = cards.len(), "cards complete");
        Ok(cards)
    }

    /// Every facet value.
    pub async fn facets(&self) -> Result<FacetCatalog> {
        let index = self.index().await?;
        Ok(FacetCatalog::from_courses(&course_metas(index.courses())))
    }

    /// Distinct course tags.
    pub async fn tags(&self) -> Result<Vec<String>> {
        Ok(self.facets().await?.tags)
    }

    /// Distinct course authors.
    pub async fn authors(&self) -> Result<Vec<String>> {
        Ok(self.facets().await?.authors)
    }

    /// Distinct course domains.
    pub async fn domains(&self) -> Result<Vec<String>> {
        Ok(self.facets().await?.domains)
    }

    /// Filter course records and return one page.
    #[instrument(skip(self))]
    pub async fn browse(&self, request: &BrowseRequest) -> Result<Page<CourseMeta>> {
        let index = self.index().await?;
        let limit = self
            .settings
            .clamp_limit(request.limit, self.settings.browse_default_limit);
        let cursor = normalize_cursor(request.cursor);

        let matching = filter(&course_metas(index.courses()), &request.filter);

        Ok(paginate(matching, cursor, limit))
    }

    /// Drop the cached index and rebuild it.
    pub async fn refresh(&self) -> Result<IndexStats> {
        let index = self.store.refresh().await?;
        let stats = index.stats();
        info!(?stats, "index refreshed");
        Ok(stats)
    }

    /// Statistics of the current index, building it if needed.
    pub async fn stats(&self) -> Result<IndexStats> {
        Ok(self.index().await?.stats())
    }
}

impl SearchRequest {
    /// Reject requests the engine cannot answer meaningfully.
    pub fn validate(&self, settings: &SearchConfig) -> Result<()> {
        validate_query(&self.query)?;
        validate_limit(self.limit, settings)
    }
}

impl CardsRequest {
    /// Reject requests the engine cannot answer meaningfully.
    pub fn validate(&self, settings: &SearchConfig) -> Result<()> {
        validate_query(&self.query)?;
        validate_limit(self.limit, settings)
    }
}

impl BrowseRequest {
    /// Reject requests the engine cannot answer meaningfully.
    pub fn validate(&self, settings: &SearchConfig) -> Result<()> {
        if self.cursor.is_some_and(|c| c < 0) {
            return Err(SearchError::invalid_request("cursor must not be negative"));
        }
        validate_limit(self.limit, settings)
    }
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(SearchError::invalid_request("query must not be empty"));
    }
    Ok(())
}

fn validate_limit(limit: Option<usize>, settings: &SearchConfig) -> Result<()> {
    match limit {
        Some(0) => Err(SearchError::invalid_request("limit must be at least 1")),
        Some(n) if n > settings.max_limit => Err(SearchError::invalid_request(format!(
            "limit must not exceed {}",
            settings.max_limit
        ))),
        _ => Ok(()),
    }
}
