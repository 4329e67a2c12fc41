//! Page generation and the build driver.
//!
//! One page at a time: parse the document, synthesize an index in its place
//! if asked, hand it to pandoc, optionally re-render the HTML with the page's
//! own front matter as context. The driver walks the content tree once,
//! snapshots the file list before generating anything, mirrors the directory
//! layout into the output root, and converts each page in sorted order.
//!
//! ## Output Layout
//!
//! A source file's logical path is its path relative to the content root with
//! the `.md` suffix stripped; the published file is `public/<logical>.html`.
//! An index page keeps its own logical name even though pandoc reads the
//! synthesized `*._index.md` — the intermediate is deleted after a successful
//! conversion and never published under its own name.
//!
//! ## Failure Policy
//!
//! The first failing page aborts the build. There is no per-file retry and
//! no partial-build continuation: an offline batch tool should stop on the
//! first broken file and name it.

use crate::config::SiteConfig;
use crate::decode::TagRegistry;
use crate::document::{DEFAULT_DELIMITER, Document, DocumentError};
use crate::index::{self, IndexError};
use crate::pandoc::{self, ConvertError};
use crate::render::{self, RenderError};
use serde_yaml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("{path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("rerender of {path}: {source}")]
    Rerender {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("source file is outside the content root: {0}")]
    OutsideContentRoot(PathBuf),
}

/// One successfully generated page.
#[derive(Debug)]
pub struct GeneratedPage {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// What a full build produced, in generation order.
#[derive(Debug)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
}

/// Run a full build: mirror directories, snapshot the content tree, generate
/// every page sequentially. The first failure aborts.
pub fn build(config: &SiteConfig, tags: &TagRegistry) -> Result<BuildReport, BuildError> {
    mirror_directories(&config.content, &config.public)?;

    let sources = content_snapshot(config)?;
    let mut pages = Vec::with_capacity(sources.len());
    for source in sources {
        println!(
            "==> Generating {}",
            logical_path(&source, &config.content)?.display()
        );
        let output = generate_page(&source, config, tags)?;
        pages.push(GeneratedPage { source, output });
    }
    Ok(BuildReport { pages })
}

/// Generate one page and return the path it was published to.
pub fn generate_page(
    md_path: &Path,
    config: &SiteConfig,
    tags: &TagRegistry,
) -> Result<PathBuf, BuildError> {
    let doc = Document::load(md_path, DEFAULT_DELIMITER, tags).map_err(|source| {
        BuildError::Document {
            path: md_path.to_path_buf(),
            source,
        }
    })?;

    let logical = logical_path(md_path, &config.content)?;
    let out_path = config.public.join(format!("{}.html", logical.display()));

    // An index page is converted from its synthesized stand-in, but keeps the
    // original logical name in the output tree.
    let mut converter_input = md_path.to_path_buf();
    let mut generated_index = None;
    if config.make_index_files && doc.is_index() {
        let generated = index::generate_index_page(md_path, config, tags)?;
        converter_input = generated.clone();
        generated_index = Some(generated);
    }

    pandoc::run(
        pandoc::command(config, &converter_input, &out_path),
        &converter_input,
    )?;

    if config.mustache_rerender {
        rerender(&out_path, &doc.metadata)?;
    }

    if let Some(generated) = generated_index {
        fs::remove_file(&generated)?;
    }

    Ok(out_path)
}

/// Final pass over converter output: the page's own front matter becomes the
/// template context, plus `__filename__` with the published file name.
fn rerender(out_path: &Path, metadata: &Mapping) -> Result<(), BuildError> {
    let rerender_err = |source: RenderError| BuildError::Rerender {
        path: out_path.to_path_buf(),
        source,
    };

    let html = fs::read_to_string(out_path)?;
    let mut context = render::context_from(metadata).map_err(rerender_err)?;
    let filename = out_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    context
        .try_insert("__filename__", &filename)
        .map_err(|e| rerender_err(e.into()))?;

    let rendered = render::render(&html, &context).map_err(rerender_err)?;
    fs::write(out_path, rendered)?;
    Ok(())
}

/// Source path → path relative to the content root with `.md` stripped.
pub fn logical_path(md_path: &Path, content_root: &Path) -> Result<PathBuf, BuildError> {
    let relative = md_path
        .strip_prefix(content_root)
        .map_err(|_| BuildError::OutsideContentRoot(md_path.to_path_buf()))?;
    let raw = relative.to_string_lossy();
    Ok(PathBuf::from(
        raw.strip_suffix(".md").unwrap_or(&raw).to_string(),
    ))
}

/// The deterministic list of files a build will process: every `.md` under
/// the content root, sorted by name, minus synthesized index files. Taken
/// once, before any generation, so nothing a build writes can feed back into
/// the same build.
pub fn content_snapshot(config: &SiteConfig) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&config.content).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.ends_with(".md") || name.ends_with(&config.generated_index_suffix) {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Recreate the content tree's directory structure under the output root.
fn mirror_directories(content: &Path, public: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(public)?;
    for entry in WalkDir::new(content).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(content)
            .map_err(|_| BuildError::OutsideContentRoot(entry.path().to_path_buf()))?;
        fs::create_dir_all(public.join(relative))?;
    }
    Ok(())
}
