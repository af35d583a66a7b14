//! Query commands - search, cards, facets and browse from the terminal

use color_eyre::eyre::{Result, WrapErr};
use lectern_core::{Config, CourseMeta};
use lectern_search::{
    BrowseRequest, CardsRequest, FacetCatalog, Page, SearchEngine, SearchRequest, SearchResultItem,
};
use serde::Serialize;

/// Which facet list to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FacetKind {
    Tags,
    Authors,
    Domains,
}

/// Run the search command.
pub async fn search(config: &Config, request: SearchRequest, json: bool) -> Result<()> {
    tracing::info!(query = %request.query, "Running search");
    let engine = SearchEngine::from_config(config);
    request.validate(engine.settings())?;

    let results = engine.search(&request).await.wrap_err("Search failed")?;
    if json {
        return print_json(&results);
    }
    print_results(&results);
    Ok(())
}

/// Run the cards command.
pub async fn cards(config: &Config, request: CardsRequest, json: bool) -> Result<()> {
    tracing::info!(query = %request.query, "Running cards");
    let engine = SearchEngine::from_config(config);
    request.validate(engine.settings())?;

    let results = engine.cards(&request).await.wrap_err("Cards query failed")?;
    if json {
        return print_json(&results);
    }
    print_results(&results);
    Ok(())
}

/// Run the facets command.
pub async fn facets(config: &Config, kind: Option<FacetKind>, json: bool) -> Result<()> {
    let engine = SearchEngine::from_config(config);
    let catalog = engine.facets().await.wrap_err("Failed to collect facets")?;

    let Some(kind) = kind else {
        if json {
            return print_json(&catalog);
        }
        print_catalog(&catalog);
        return Ok(());
    };

    let values = match kind {
        FacetKind::Tags => &catalog.tags,
        FacetKind::Authors => &catalog.authors,
        FacetKind::Domains => &catalog.domains,
    };
    if json {
        return print_json(values);
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}

/// Run the browse command.
pub async fn browse(config: &Config, request: BrowseRequest, json: bool) -> Result<()> {
    let engine = SearchEngine::from_config(config);
    request.validate(engine.settings())?;

    let page = engine.browse(&request).await.wrap_err("Browse failed")?;
    if json {
        return print_json(&page);
    }
    print_page(&page);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).wrap_err("Failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn print_results(results: &[SearchResultItem]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }

    for (rank, item) in results.iter().enumerate() {
        println!("{:>3}. {} [{}]", rank + 1, item.title, item.score);
        println!("     {}", item.url);
        if let Some(author) = &item.author {
            println!("     by {author}");
        }
        if !item.snippet.is_empty() {
            println!("     {}", item.snippet);
        }
    }
}

fn print_catalog(catalog: &FacetCatalog) {
    let sections = [
        ("Tags", &catalog.tags),
        ("Authors", &catalog.authors),
        ("Domains", &catalog.domains),
    ];
    for (name, values) in sections {
        println!("{name} ({}):", values.len());
        for value in values {
            println!("  {value}");
        }
    }
}

fn print_page(page: &Page<CourseMeta>) {
    for meta in &page.items {
        let title = meta.title.as_deref().unwrap_or(&meta.slug);
        println!("  {title} ({})", meta.slug);
    }
    println!();
    match page.next_cursor {
        Some(next) => println!("  {} of {} courses, next cursor: {next}", page.items.len(), page.total),
        None => println!("  {} of {} courses", page.items.len(), page.total),
    }
}
