//! Content loading.
//!
//! Walks the content tree, parses every markdown file, and returns a flat list
//! of documents. A file that cannot be read is skipped; only an unreadable
//! root aborts the load.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use lectern_core::{
    ContentPath, Document, config::ContentConfig, content::is_markdown,
};
use lectern_parser::DocumentParser;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{IndexError, Result};

/// A source of documents for the index store.
pub trait DocumentSource: Send + Sync {
    /// Load every document. Must be idempotent and side-effect free.
    fn load(&self) -> Result<LoadReport>;
}

/// A file left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Path of the file.
    pub path: PathBuf,

    /// Why the file was skipped.
    pub reason: String,
}

/// Outcome of a load: documents ordered by id, plus the files skipped.
#[derive(Debug, Default, Clone)]
pub struct LoadReport {
    /// Loaded documents, unique by id.
    pub documents: Vec<Document>,

    /// Files that failed to load.
    pub skipped: Vec<SkippedFile>,
}

/// Loads markdown documents from a content directory.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    root: PathBuf,
    layout: ContentConfig,
    parser: DocumentParser,
}

impl DocumentLoader {
    /// Create a loader rooted at `layout.root`.
    #[must_use]
    pub fn new(layout: ContentConfig) -> Self {
        let root = PathBuf::from(&layout.root);
        Self::with_root(root, layout)
    }

    /// Create a loader for an explicit root directory.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>, layout: ContentConfig) -> Self {
        Self {
            root: root.into(),
            layout,
            parser: DocumentParser::new(),
        }
    }

    /// Content root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find all markdown files under the root, in path order.
    fn find_markdown_files(&self) -> Result<(Vec<PathBuf>, Vec<SkippedFile>)> {
        // Distinguish a broken source from an empty one.
        fs::read_dir(&self.root).map_err(|e| IndexError::source_unavailable(&self.root, e))?;

        let mut files = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && is_markdown(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    skipped.push(SkippedFile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok((files, skipped))
    }

    /// Parse a single file into a document.
    fn parse_file(&self, path: &Path) -> std::result::Result<Document, String> {
        debug!(path = %path.display(), "parsing file");

        let source = fs::read_to_string(path).map_err(|e| e.to_string())?;

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let content_path = ContentPath::from_path(relative, &self.layout)
            .ok_or_else(|| format!("invalid content path: {}", relative.display()))?;

        Ok(self.parser.parse(&source, &content_path, path))
    }
}

impl DocumentSource for DocumentLoader {
    fn load(&self) -> Result<LoadReport> {
        info!(dir = %self.root.display(), "loading content");

        let (files, mut skipped) = self.find_markdown_files()?;
        info!(count = files.len(), "found markdown files");

        let parsed: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.parse_file(path)))
            .collect();

        // Later duplicates replace earlier ones; the map keeps id order.
        let mut by_id: BTreeMap<String, Document> = BTreeMap::new();
        for (path, result) in parsed {
            match result {
                Ok(doc) => {
                    by_id.insert(doc.id.clone(), doc);
                }
                Err(reason) => {
                    warn!(path = %path.display(), error = %reason, "failed to load file");
                    skipped.push(SkippedFile {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        let documents: Vec<Document> = by_id.into_values().collect();
        info!(
            documents = documents.len(),
            skipped = skipped.len(),
            "content load complete"
        );

        Ok(LoadReport { documents, skipped })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
