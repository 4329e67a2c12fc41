//! Index page synthesis.
//!
//! A document with `index: true` in its front matter does not get converted
//! as-is. Instead its body is treated as a template over the front matter of
//! its *siblings* — the files in the same directory whose names share its
//! stem — and the expansion is written out as a synthesized markdown file
//! that takes the original's place in the pandoc invocation.
//!
//! An index author writes presentation, not plumbing:
//!
//! ```markdown
//! ---
//! title: Blog
//! index: true
//! ---
//! All posts:
//! {% for child in children %}
//! - [{{ child.title }}]({{ child.__filename__ }})
//! {% endfor %}
//! ```
//!
//! With siblings `blog.1.md`, `blog.2.md` next to `blog.md`, each sibling's
//! front matter becomes one element of `children`, carrying a synthetic
//! `__filename__` key with the page it will render to (`blog.1.html`).
//!
//! Failure is all-or-nothing: one unparsable sibling, a missing
//! `template_file`, or a render error aborts the whole index — a partial
//! index that silently drops entries would be worse than no build.

use crate::config::SiteConfig;
use crate::decode::TagRegistry;
use crate::document::{DEFAULT_DELIMITER, Document, DocumentError};
use crate::render::{self, RenderError};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Goes at the top of every synthesized body; pandoc passes HTML comments
// through, so it also lands in the published page source.
const GENERATED_BANNER: &str =
    "<!-- this page was generated from sibling front matter; edits will be overwritten -->";

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error("failed to read template_file {path}: {source}")]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Synthesize the index page for `original` and return the path it was
/// written to (the original with its `.md` suffix swapped for the configured
/// generated-index suffix, in the same directory).
pub fn generate_index_page(
    original: &Path,
    config: &SiteConfig,
    tags: &TagRegistry,
) -> Result<PathBuf, IndexError> {
    let generated = generated_index_path(original, &config.generated_index_suffix);

    let mut doc =
        Document::load(original, DEFAULT_DELIMITER, tags).map_err(|source| IndexError::Document {
            path: original.to_path_buf(),
            source,
        })?;

    // The body may be only a fragment; template_file supplies the rest.
    if let Some(template_file) = doc.template_file() {
        let path = config.resolve(template_file);
        let fragment = fs::read_to_string(&path)
            .map_err(|source| IndexError::TemplateFile { path, source })?;
        doc.body.push_str(&fragment);
    }

    let mut children = Vec::new();
    for sibling in discover_siblings(original, &config.generated_index_suffix)? {
        let mut metadata = Document::load(&sibling, DEFAULT_DELIMITER, tags)
            .map_err(|source| IndexError::Document {
                path: sibling.clone(),
                source,
            })?
            .metadata;
        metadata.insert(
            Value::String("__filename__".into()),
            Value::String(output_name(&sibling)),
        );
        children.push(metadata);
    }

    let mut context = tera::Context::new();
    context
        .try_insert("children", &children)
        .map_err(RenderError::from)?;
    let rendered = render::render(&doc.body, &context)?;
    doc.body = format!("{GENERATED_BANNER}\n\n{rendered}");

    let text = doc
        .to_text(DEFAULT_DELIMITER)
        .map_err(|source| IndexError::Document {
            path: generated.clone(),
            source,
        })?;
    fs::write(&generated, text).map_err(|source| IndexError::Write {
        path: generated.clone(),
        source,
    })?;

    Ok(generated)
}

/// Files next to `original` whose names start with its stem, sorted by name.
///
/// The original itself and previously synthesized index files are excluded,
/// so repeated builds never re-ingest their own output. Everything else that
/// matches the stem prefix is in — a non-document file matching the pattern
/// is a parse error at collection time, by design.
fn discover_siblings(original: &Path, generated_suffix: &str) -> Result<Vec<PathBuf>, IndexError> {
    let parent = match original.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let original_name = original
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let scan_err = |source| IndexError::Scan {
        path: parent.to_path_buf(),
        source,
    };

    let mut siblings = Vec::new();
    for entry in fs::read_dir(parent).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&stem) || name == original_name || name.ends_with(generated_suffix) {
            continue;
        }
        siblings.push(entry.path());
    }
    siblings.sort();
    Ok(siblings)
}

/// `blog.1.md` → `blog.1.html`: the name a sibling will be published under,
/// handed to templates as `__filename__`.
fn output_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(".md").unwrap_or(&name);
    format!("{stem}.html")
}

fn generated_index_path(original: &Path, suffix: &str) -> PathBuf {
    let raw = original.to_string_lossy();
    let trimmed = raw.strip_suffix(".md").unwrap_or(&raw);
    PathBuf::from(format!("{trimmed}{suffix}"))
}

// TODO: configurable ordering for index entries (front-matter weight or date)
// instead of file-name order.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::write_file;
    use tempfile::TempDir;

    fn registry() -> TagRegistry {
        TagRegistry::with_builtins()
    }

    fn setup() -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let config = crate::test_helpers::sample_config(dir.path());
        fs::create_dir_all(&config.content).unwrap();
        (dir, config)
    }

    fn post(title: &str) -> String {
        format!("---\ntitle: {title}\n---\nBody of {title}.\n")
    }

    const INDEX_BODY: &str = concat!(
        "---\n",
        "title: Notes\n",
        "index: true\n",
        "---\n",
        "{% for child in children %}",
        "[{{ child.title }}]({{ child.__filename__ }})\n",
        "{% endfor %}",
    );

    #[test]
    fn generated_path_swaps_suffix() {
        assert_eq!(
            generated_index_path(Path::new("content/notes.md"), "._index.md"),
            PathBuf::from("content/notes._index.md")
        );
    }

    #[test]
    fn output_name_swaps_md_for_html() {
        assert_eq!(output_name(Path::new("content/notes.1.md")), "notes.1.html");
        assert_eq!(output_name(Path::new("notes.md")), "notes.html");
    }

    #[test]
    fn collects_sibling_titles_in_name_order() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);
        write_file(&config.content, "notes.2.md", &post("Second"));
        write_file(&config.content, "notes.1.md", &post("First"));
        write_file(&config.content, "notes.3.md", &post("Third"));

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();

        assert_eq!(
            doc.body.matches("[First](notes.1.html)").count(),
            1,
            "body was: {}",
            doc.body
        );
        let first = doc.body.find("[First]").unwrap();
        let second = doc.body.find("[Second]").unwrap();
        let third = doc.body.find("[Third]").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn generated_document_keeps_the_original_front_matter() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);
        write_file(&config.content, "notes.1.md", &post("First"));

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();
        assert_eq!(doc.metadata.get("title"), Some(&Value::String("Notes".into())));
        assert!(doc.is_index());
    }

    #[test]
    fn excludes_itself_and_previously_generated_output() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);
        write_file(&config.content, "notes.1.md", &post("First"));
        // Leftover from an earlier run; must not be picked up as a sibling.
        write_file(&config.content, "notes._index.md", &post("Stale"));

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();
        assert!(doc.body.contains("First"));
        assert!(!doc.body.contains("Stale"));
        assert!(!doc.body.contains("Notes]("));
    }

    #[test]
    fn no_siblings_renders_an_empty_list() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();
        assert!(!doc.body.contains("]("));
    }

    #[test]
    fn template_file_contents_are_appended_before_rendering() {
        let (dir, config) = setup();
        write_file(
            dir.path(),
            "fragment.html",
            "{% for child in children %}<li>{{ child.title }}</li>{% endfor %}",
        );
        // Empty body: everything comes from the fragment.
        let index = write_file(
            &config.content,
            "notes.md",
            "---\ntitle: Notes\nindex: true\ntemplate_file: fragment.html\n---\n",
        );
        write_file(&config.content, "notes.1.md", &post("First"));

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();
        assert!(doc.body.contains("<li>First</li>"), "body was: {}", doc.body);
    }

    #[test]
    fn missing_template_file_is_fatal_and_names_the_path() {
        let (_dir, config) = setup();
        let index = write_file(
            &config.content,
            "notes.md",
            "---\nindex: true\ntemplate_file: nowhere.html\n---\n",
        );

        let err = generate_index_page(&index, &config, &registry()).unwrap_err();
        match err {
            IndexError::TemplateFile { path, .. } => {
                assert!(path.ends_with("nowhere.html"));
            }
            other => panic!("expected TemplateFile, got {other:?}"),
        }
    }

    #[test]
    fn unparsable_sibling_aborts_the_whole_index() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);
        write_file(&config.content, "notes.1.md", &post("First"));
        write_file(&config.content, "notes.2.md", "no front matter here\n");

        let err = generate_index_page(&index, &config, &registry()).unwrap_err();
        match err {
            IndexError::Document { path, .. } => assert!(path.ends_with("notes.2.md")),
            other => panic!("expected Document, got {other:?}"),
        }
        // No partial index was written.
        assert!(!config.content.join("notes._index.md").exists());
    }

    #[test]
    fn render_error_in_the_body_is_fatal() {
        let (_dir, config) = setup();
        let index = write_file(
            &config.content,
            "notes.md",
            "---\nindex: true\n---\n{{ nonexistent_variable }}\n",
        );

        let err = generate_index_page(&index, &config, &registry()).unwrap_err();
        assert!(matches!(err, IndexError::Render(_)));
    }

    #[test]
    fn banner_marks_the_synthesized_body() {
        let (_dir, config) = setup();
        let index = write_file(&config.content, "notes.md", INDEX_BODY);

        let generated = generate_index_page(&index, &config, &registry()).unwrap();
        let doc = Document::load(&generated, DEFAULT_DELIMITER, &registry()).unwrap();
        assert!(doc.body.starts_with("<!--"));
    }
}
