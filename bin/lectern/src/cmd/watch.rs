//! Content watcher - invalidate the index when the content tree changes

use std::{path::Path, sync::Arc, time::Duration};

use color_eyre::eyre::{Result, WrapErr};
use lectern_search::SearchEngine;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::sync::mpsc;

/// Quiet period after the last change before the index is invalidated.
const DEBOUNCE_MS: u64 = 200;

/// Whether a file-system event can change indexed content.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
            | EventKind::Create(_)
            | EventKind::Remove(_)
    )
}

/// Pass a content change on to the debounce task. Returns whether one was sent.
fn forward(tx: &mpsc::Sender<()>, res: notify::Result<notify::Event>) -> bool {
    match res {
        Ok(event) if is_content_change(&event.kind) => match tx.blocking_send(()) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("dropping change event: {e}");
                false
            }
        },
        Ok(_) => false,
        Err(e) => {
            tracing::warn!("watch error: {e}");
            false
        }
    }
}

/// Watch `root` and invalidate the engine's index after each burst of changes.
///
/// The returned watcher must be kept alive for as long as watching should last.
pub fn spawn(root: &Path, engine: Arc<SearchEngine>) -> Result<RecommendedWatcher> {
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            forward(&tx, res);
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .wrap_err_with(|| format!("Failed to watch {}", root.display()))?;
    tracing::info!(root = %root.display(), "Watching content directory");

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait until changes stop arriving.
            while let Ok(Some(())) =
                tokio::time::timeout(Duration::from_millis(DEBOUNCE_MS), rx.recv()).await
            {}

            tracing::info!("Content changed, invalidating index");
            engine.store().invalidate().await;
        }
    });

    Ok(watcher)
}
