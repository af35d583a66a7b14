//! Check command - validate configuration and content

use color_eyre::eyre::{Result, bail};
use lectern_core::{Config, CourseMeta, Lang};
use lectern_index::{DocumentLoader, DocumentSource, Index};
use lectern_search::{FacetCatalog, facets::course_metas};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads the whole content tree once and reports what the index would hold.
/// With `strict`, any skipped file or metadata warning fails the check.
pub fn run(config: &Config, strict: bool) -> Result<()> {
    tracing::info!(root = %config.content.root, strict, "Checking content");

    let mut result = ValidationResult::default();

    println!("Checking content in {}...", config.content.root);
    let loader = DocumentLoader::new(config.content.clone());
    match loader.load() {
        Ok(report) => {
            let index = Index::from_documents(report.documents);
            for skipped in &report.skipped {
                result.add_warning(format!(
                    "Skipped {}: {}",
                    skipped.path.display(),
                    skipped.reason
                ));
            }
            print_counts(&index, report.skipped.len());

            let metas = course_metas(index.courses());
            check_courses(&metas, &mut result);
            print_facets(&FacetCatalog::from_courses(&metas));
        }
        Err(e) => {
            result.add_error(format!("Content root unreadable: {e}"));
            println!("  ✗ {e}");
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn print_counts(index: &Index, skipped: usize) {
    let stats = index.stats();
    println!("  Documents:    {:>6}", stats.documents);
    println!("  Courses:      {:>6}", stats.courses);
    println!("  Resources:    {:>6}", stats.resources);
    println!("  Generic:      {:>6}", stats.generic);
    println!("  Skipped:      {skipped:>6}");
}

fn print_facets(catalog: &FacetCatalog) {
    println!("  Tags:         {:>6}", catalog.tags.len());
    println!("  Authors:      {:>6}", catalog.authors.len());
    println!("  Domains:      {:>6}", catalog.domains.len());
}

/// Flag courses whose metadata leaves them out of facets or filters.
fn check_courses(metas: &[CourseMeta], result: &mut ValidationResult) {
    for meta in metas {
        if meta.title.is_none() {
            result.add_warning(format!("Course '{}' has no entry file", meta.slug));
            continue;
        }
        if meta.tags.is_empty() {
            result.add_warning(format!("Course '{}' has no tags", meta.slug));
        }
        if meta.author.is_none() {
            result.add_warning(format!("Course '{}' has no author", meta.slug));
        }
        if let Some(lang) = &meta.lang
            && lang.parse::<Lang>().is_err()
        {
            result.add_warning(format!(
                "Course '{}' has unsupported language '{lang}'",
                meta.slug
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;

    fn config_for(root: &Path) -> Config {
        let mut config = Config::default();
        config.content.root = root.display().to_string();
        config
    }

    fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, content).expect("write");
    }

    #[test]
    fn test_check_passes_on_clean_tree() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "blog/lpic1/course.md",
            b"---\ntitle: LPIC\ntags: [linux]\nauthor: Alice\n---\nBody",
        );

        assert!(run(&config_for(dir.path()), true).is_ok());
    }

    #[test]
    fn test_strict_fails_on_skipped_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write(
            dir.path(),
            "blog/lpic1/course.md",
            b"---\ntitle: LPIC\ntags: [linux]\nauthor: Alice\n---\nBody",
        );
        write(dir.path(), "blog/broken/course.md", &[0xff, 0xfe]);

        let config = config_for(dir.path());
        assert!(run(&config, false).is_ok());
        assert!(run(&config, true).is_err());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = config_for(&dir.path().join("absent"));
        assert!(run(&config, false).is_err());
    }

    #[test]
    fn test_check_courses_warnings() {
        let mut result = ValidationResult::default();
        let metas = vec![
            CourseMeta::bare("orphan"),
            CourseMeta {
                title: Some("Untagged".into()),
                lang: Some("de".into()),
                ..CourseMeta::bare("untagged")
            },
        ];
        check_courses(&metas, &mut result);

        assert_eq!(result.warnings.len(), 4);
        assert!(result.warnings[0].contains("no entry file"));
        assert!(result.warnings.iter().any(|w| w.contains("unsupported language 'de'")));
    }
}
