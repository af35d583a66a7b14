//! Lectern Core Library
//!
//! Core types, configuration, and error handling for the lectern content search engine.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;

pub use config::Config;
pub use content::{ContentPath, CourseMeta, Document, DocumentKind, Lang};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
