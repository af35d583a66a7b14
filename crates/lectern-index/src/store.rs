//! In-memory index store.
//!
//! The store builds lazily on first access, holds the result for the process
//! lifetime and rebuilds only after an explicit [`IndexStore::invalidate`].
//! Readers share the built [`Index`] through an `Arc` and never mutate it.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use lectern_core::{Document, DocumentKind};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    IndexError, Result,
    loader::{DocumentSource, LoadReport, SkippedFile},
};

/// An immutable snapshot of every indexed document.
#[derive(Debug, Default, Clone)]
pub struct Index {
    documents: Vec<Document>,
    skipped: Vec<SkippedFile>,
    build_duration: Duration,
}

/// Summary statistics of a built index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Total documents.
    pub documents: usize,
    /// Course documents.
    pub courses: usize,
    /// Resource documents.
    pub resources: usize,
    /// Generic documents.
    pub generic: usize,
    /// Files skipped during the load.
    pub skipped: usize,
    /// Build duration in milliseconds.
    pub build_ms: u128,
}

impl Index {
    /// Build an index from documents, keeping their order.
    ///
    /// A later document with an already seen id replaces the earlier one.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<Document> = Vec::new();

        for doc in documents {
            if let Some(&pos) = positions.get(&doc.id) {
                unique[pos] = doc;
            } else {
                positions.insert(doc.id.clone(), unique.len());
                unique.push(doc);
            }
        }

        Self {
            documents: unique,
            skipped: Vec::new(),
            build_duration: Duration::ZERO,
        }
    }

    fn from_report(report: LoadReport, build_duration: Duration) -> Self {
        let mut index = Self::from_documents(report.documents);
        index.skipped = report.skipped;
        index.build_duration = build_duration;
        index
    }

    /// All documents in index order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Course documents in index order.
    pub fn courses(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter().filter(|d| d.is_course())
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Files skipped during the build.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the index holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Summary statistics.
    pub fn stats(&self) -> IndexStats {
        let count = |kind: DocumentKind| self.documents.iter().filter(|d| d.kind == kind).count();
        IndexStats {
            documents: self.documents.len(),
            courses: count(DocumentKind::Course),
            resources: count(DocumentKind::Resource),
            generic: count(DocumentKind::Generic),
            skipped: self.skipped.len(),
            build_ms: self.build_duration.as_millis(),
        }
    }
}

/// Lazily built, explicitly invalidated document store.
///
/// A single mutex guards the "build if absent" transition so concurrent
/// callers during a cold build wait for one build instead of racing.
///
/// A load that outlives the build timeout keeps running on the blocking pool;
/// the next build waits on that load instead of starting another, so at most
/// one load per store is ever in flight.
pub struct IndexStore {
    source: Arc<dyn DocumentSource>,
    build_timeout: Duration,
    cached: Mutex<Option<Arc<Index>>>,
    in_flight: Mutex<Option<PendingLoad>>,
}

/// A source load still running after its build timed out.
struct PendingLoad {
    started: Instant,
    task: JoinHandle<Result<LoadReport>>,
}

impl std::fmt::Debug for IndexStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexStore")
            .field("build_timeout", &self.build_timeout)
            .finish_non_exhaustive()
    }
}

impl IndexStore {
    /// Create a store over a document source.
    pub fn new(source: impl DocumentSource + 'static, build_timeout: Duration) -> Self {
        Self {
            source: Arc::new(source),
            build_timeout,
            cached: Mutex::new(None),
            in_flight: Mutex::new(None),
        }
    }

    /// Build a fresh index from the source, bypassing the cache.
    ///
    /// Expensive; callers should go through [`IndexStore::get`].
    pub async fn build(&self) -> Result<Index> {
        let mut in_flight = self.in_flight.lock().await;
        let PendingLoad { started, mut task } = match in_flight.take() {
            Some(pending) => {
                debug!("waiting on earlier index load");
                pending
            }
            None => {
                let source = Arc::clone(&self.source);
                PendingLoad {
                    started: Instant::now(),
                    task: tokio::task::spawn_blocking(move || source.load()),
                }
            }
        };

        let report = match tokio::time::timeout(self.build_timeout, &mut task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => return Err(IndexError::BuildTask(join_err.to_string())),
            Err(_) => {
                warn!(timeout = ?self.build_timeout, "index build timed out");
                *in_flight = Some(PendingLoad { started, task });
                return Err(IndexError::BuildTimeout {
                    timeout: self.build_timeout,
                });
            }
        };

        let index = Index::from_report(report, started.elapsed());
        info!(stats = ?index.stats(), "index built");
        Ok(index)
    }

    /// Get the cached index, building it on first access.
    pub async fn get(&self) -> Result<Arc<Index>> {
        let mut cached = self.cached.lock().await;
        if let Some(index) = cached.as_ref() {
            return Ok(Arc::clone(index));
        }

        debug!("cold index build");
        let index = Arc::new(self.build().await?);
        *cached = Some(Arc::clone(&index));
        Ok(index)
    }

    /// Drop the cached index; the next [`IndexStore::get`] rebuilds.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        if cached.take().is_some() {
            info!("index invalidated");
        }
    }

    /// Invalidate and rebuild in one step.
    pub async fn refresh(&self) -> Result<Arc<Index>> {
        let mut cached = self.cached.lock().await;
        cached.take();
        let index = Arc::new(self.build().await?);
        *cached = Some(Arc::clone(&index));
        Ok(index)
    }

    /// The cached index, if built, without triggering a build.
    pub async fn peek(&self) -> Option<Arc<Index>> {
        self.cached.lock().await.clone()
    }
}
