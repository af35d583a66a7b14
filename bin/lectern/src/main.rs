//! Lectern CLI
//!
//! Search, browse and serve a markdown course catalog.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use lectern::cmd::query::FacetKind;
use lectern_core::Lang;
use lectern_search::{BrowseRequest, CardsRequest, FilterOptions, SearchRequest};

/// Command-line interface for Lectern.
#[derive(Parser)]
#[command(name = "lectern", version, about = "Search and browse a markdown course catalog")]
struct Cli {
    /// Path to configuration file (defaults to lectern.toml when present)
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Facet filters shared by `cards` and `browse`.
#[derive(clap::Args, Debug, Default)]
struct FacetArgs {
    /// Only this language (en, fr)
    #[arg(long)]
    lang: Option<Lang>,
    /// Only these domains (repeatable)
    #[arg(long = "domain")]
    domains: Vec<String>,
    /// Only these authors (repeatable)
    #[arg(long = "author")]
    authors: Vec<String>,
    /// Any of these tags (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Ranked full-text search
    Search {
        /// Query text
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        /// Only this language (en, fr)
        #[arg(long)]
        lang: Option<Lang>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Search, then filter hits by course facets
    Cards {
        /// Query text
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
        #[command(flatten)]
        facets: FacetArgs,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// List facet values
    Facets {
        /// Only this facet
        #[arg(value_enum)]
        kind: Option<FacetKind>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Filter courses and page through them
    Browse {
        #[command(flatten)]
        facets: FacetArgs,
        /// Page size
        #[arg(short, long)]
        limit: Option<usize>,
        /// Offset of the page
        #[arg(long, allow_negative_numbers = true)]
        cursor: Option<i64>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate configuration and content
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Serve the JSON API
    Serve {
        /// Port to listen on (overrides the config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Invalidate the index when content changes
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    lectern::init_tracing(cli.verbose);

    let mut config = lectern::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            query,
            limit,
            lang,
            json,
        } => {
            let request = SearchRequest { query, limit, lang };
            lectern::cmd::query::search(&config, request, json).await?;
        }
        Commands::Cards {
            query,
            limit,
            facets,
            json,
        } => {
            let request = CardsRequest {
                query,
                limit,
                lang: facets.lang,
                domains: facets.domains,
                authors: facets.authors,
                tags: facets.tags,
            };
            lectern::cmd::query::cards(&config, request, json).await?;
        }
        Commands::Facets { kind, json } => {
            lectern::cmd::query::facets(&config, kind, json).await?;
        }
        Commands::Browse {
            facets,
            limit,
            cursor,
            json,
        } => {
            let request = BrowseRequest {
                filter: FilterOptions {
                    lang: facets.lang,
                    domains: facets.domains,
                    authors: facets.authors,
                    tags: facets.tags,
                },
                limit,
                cursor,
            };
            lectern::cmd::query::browse(&config, request, json).await?;
        }
        Commands::Check { strict } => {
            lectern::cmd::check::run(&config, strict)?;
        }
        Commands::Serve { port, watch } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            lectern::cmd::serve::run(&config, watch).await?;
        }
    }

    Ok(())
}
