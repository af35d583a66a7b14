//! Serve command - JSON API over HTTP

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use lectern_core::Config;
use lectern_search::SearchEngine;
use tokio::net::TcpListener;

use crate::server::create_router;

/// Run the serve command.
///
/// Warms the index, then answers API requests until Ctrl+C. With `watch`, the
/// index is invalidated whenever the content tree changes.
pub async fn run(config: &Config, watch: bool) -> Result<()> {
    let engine = Arc::new(SearchEngine::from_config(config));

    // A failed warm-up is not fatal; requests will retry the build.
    match engine.stats().await {
        Ok(stats) => println!(
            "  Indexed {} documents ({} courses) in {}ms",
            stats.documents, stats.courses, stats.build_ms
        ),
        Err(e) => {
            tracing::warn!(error = %e, "initial index build failed");
            eprintln!("  ⚠ Initial index build failed: {e}");
        }
    }

    let _watcher = if watch {
        Some(super::watch::spawn(
            Path::new(&config.content.root),
            Arc::clone(&engine),
        )?)
    } else {
        None
    };

    let app = create_router(engine);
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  API server running at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
