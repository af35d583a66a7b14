//! Engine configuration management.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for lectern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content tree layout.
    #[serde(default)]
    pub content: ContentConfig,

    /// Search and pagination settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Layout of the markdown content tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory of the content tree.
    #[serde(default = "default_root")]
    pub root: String,

    /// Top-level directory holding one sub-directory per course.
    #[serde(default = "default_course_dir")]
    pub course_dir: String,

    /// Top-level directory holding standalone resource pages.
    #[serde(default = "default_resource_dir")]
    pub resource_dir: String,

    /// Name of the file carrying a course's metadata.
    #[serde(default = "default_course_file")]
    pub course_file: String,

    /// URL prefix for course pages.
    #[serde(default = "default_course_url_prefix")]
    pub course_url_prefix: String,

    /// URL prefix for resource pages.
    #[serde(default = "default_resource_url_prefix")]
    pub resource_url_prefix: String,
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Result count when the caller gives no limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound applied to any requested limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Snippet window in characters.
    #[serde(default = "default_snippet_size")]
    pub snippet_size: usize,

    /// Score assigned to exact author/tag matches.
    #[serde(default = "default_exact_match_score")]
    pub exact_match_score: u32,

    /// Upper bound on a cold index build, in seconds.
    #[serde(default = "default_build_timeout_secs")]
    pub build_timeout_secs: u64,

    /// Page size for filtered browsing when the caller gives none.
    #[serde(default = "default_browse_limit")]
    pub browse_default_limit: usize,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_root() -> String {
    "docs".to_string()
}

fn default_course_dir() -> String {
    "blog".to_string()
}

fn default_resource_dir() -> String {
    "res".to_string()
}

fn default_course_file() -> String {
    "course.md".to_string()
}

fn default_course_url_prefix() -> String {
    "/b".to_string()
}

fn default_resource_url_prefix() -> String {
    "/res".to_string()
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    50
}

fn default_snippet_size() -> usize {
    180
}

fn default_exact_match_score() -> u32 {
    1000
}

fn default_build_timeout_secs() -> u64 {
    30
}

fn default_browse_limit() -> usize {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            course_dir: default_course_dir(),
            resource_dir: default_resource_dir(),
            course_file: default_course_file(),
            course_url_prefix: default_course_url_prefix(),
            resource_url_prefix: default_resource_url_prefix(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            snippet_size: default_snippet_size(),
            exact_match_score: default_exact_match_score(),
            build_timeout_secs: default_build_timeout_secs(),
            browse_default_limit: default_browse_limit(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl SearchConfig {
    /// Clamp a requested limit into `1..=max_limit`, using `fallback` when absent.
    pub fn clamp_limit(&self, requested: Option<usize>, fallback: usize) -> usize {
        requested.unwrap_or(fallback).clamp(1, self.max_limit.max(1))
    }

    /// Cold build timeout.
    pub fn build_timeout(&self) -> Duration {
        Duration::from_secs(self.build_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration layered with `LECTERN__SECTION__KEY` environment variables.
    ///
    /// A missing file is allowed here; defaults fill every section.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("LECTERN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.content.root.trim().is_empty() {
            return Err(CoreError::config("content.root cannot be empty"));
        }

        if self.search.max_limit == 0 {
            return Err(CoreError::config("search.max_limit must be at least 1"));
        }

        if self.search.default_limit == 0 || self.search.default_limit > self.search.max_limit {
            return Err(CoreError::config(
                "search.default_limit must be between 1 and search.max_limit",
            ));
        }

        if self.search.snippet_size == 0 {
            return Err(CoreError::config("search.snippet_size must be at least 1"));
        }

        if self.search.build_timeout_secs == 0 {
            return Err(CoreError::config(
                "search.build_timeout_secs must be at least 1",
            ));
        }

        if self.search.browse_default_limit == 0 {
            return Err(CoreError::config(
                "search.browse_default_limit must be at least 1",
            ));
        }

        if !self.content.course_url_prefix.starts_with('/') {
            tracing::warn!("content.course_url_prefix should start with a slash");
        }

        Ok(())
    }

    /// Bind address for the HTTP transport.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[content]
root = "content"
course_dir = "courses"
course_url_prefix = "/c"

[search]
default_limit = 10
max_limit = 25
snippet_size = 120
build_timeout_secs = 5

[server]
port = 8080
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("lectern.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.content.root, "content");
        assert_eq!(config.content.course_dir, "courses");
        assert_eq!(config.content.resource_dir, "res");
        assert_eq!(config.content.course_url_prefix, "/c");
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.max_limit, 25);
        assert_eq!(config.search.snippet_size, 120);
        assert_eq!(config.search.build_timeout(), Duration::from_secs(5));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("lectern.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.content.root, "docs");
        assert_eq!(config.content.course_file, "course.md");
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.search.max_limit, 50);
        assert_eq!(config.search.snippet_size, 180);
        assert_eq!(config.search.exact_match_score, 1000);
        assert_eq!(config.search.browse_default_limit, 10);
    }

    #[test]
    fn test_clamp_limit() {
        let search = SearchConfig::default();
        assert_eq!(search.clamp_limit(None, 20), 20);
        assert_eq!(search.clamp_limit(Some(0), 20), 1);
        assert_eq!(search.clamp_limit(Some(500), 20), 50);
        assert_eq!(search.clamp_limit(Some(7), 20), 7);
    }

    #[test]
    fn test_config_validation_limits() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("lectern.toml");
        let config_content = r#"
[search]
default_limit = 60
max_limit = 50
"#;
        std::fs::write(&config_path, config_content).expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("default_limit"));
    }

    #[test]
    fn test_load_with_env_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = Config::load_with_env(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.content.root, "docs");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/lectern.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
