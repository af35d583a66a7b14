//! Lectern CLI Library
//!
//! Command implementations and the HTTP transport for the lectern search
//! engine, shared by the binary entry point and its tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (search, cards, facets, browse, check, serve)
//! - [`server`] - JSON-over-HTTP transport
//!
//! # Example
//!
//! ```no_run
//! use lectern::load_config;
//!
//! let config = load_config(None).unwrap();
//! println!("serving {}", config.content.root);
//! ```

pub mod cmd;
pub mod server;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, bail};
pub use lectern_core::Config;
pub use lectern_search::SearchEngine;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lectern.toml";

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Load configuration, layered with `LECTERN__*` environment variables.
///
/// An explicitly passed file must exist; without one, `lectern.toml` is read
/// if present and defaults apply otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Configuration file not found: {}", path.display());
            }
            path
        }
        None => Path::new(DEFAULT_CONFIG_FILE),
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    Config::load_with_env(path).wrap_err("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = load_config(Some(&dir.path().join("absent.toml"))).expect_err("must fail");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_explicit_config_is_read() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        writeln!(file, "[search]\nmax_limit = 30\ndefault_limit = 5").expect("write");

        let config = load_config(Some(file.path())).expect("load");
        assert_eq!(config.search.max_limit, 30);
        assert_eq!(config.search.default_limit, 5);
        assert_eq!(config.server.port, 3000);
    }
}
