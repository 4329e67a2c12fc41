//! Build configuration.
//!
//! One YAML file drives a build. Anchors plus the `!join` tag keep the path
//! wiring free of repetition:
//!
//! ```yaml
//! # base directories, relative to this file
//! content: &CONTENT_DIR "./content/"
//! public: &PUBLIC_DIR "./public/"
//! resources: &RESOURCES_DIR "./resources/"
//!
//! # pandoc include files
//! header: !join [*RESOURCES_DIR, "header.html"]
//! before: !join [*RESOURCES_DIR, "before-body.html"]
//! after: !join [*RESOURCES_DIR, "after-body.html"]
//!
//! # pandoc filter scripts, applied in order
//! filters: []
//!
//! # index synthesis
//! make_index_files: true
//! generated_index_suffix: "._index.md"
//!
//! # re-render converted pages with their front matter as context
//! mustache_rerender: true
//! ```
//!
//! Every relative path — including `template_file` values in front matter —
//! resolves against the directory containing the config file, so a build can
//! be launched from anywhere. The loaded [`SiteConfig`] is a plain value
//! passed by reference into every component; there is no global.
//!
//! Unknown keys are rejected to catch typos early.

use crate::decode::{DecodeError, TagRegistry};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config tag error: {0}")]
    Decode(#[from] DecodeError),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory scanned for markdown content.
    pub content: PathBuf,
    /// Directory the generated HTML lands in.
    pub public: PathBuf,
    /// Base directory referenced by anchors inside the config file itself.
    #[serde(default)]
    pub resources: Option<PathBuf>,
    /// Passed to pandoc as `--include-in-header`.
    pub header: PathBuf,
    /// Passed to pandoc as `--include-before-body`.
    pub before: PathBuf,
    /// Passed to pandoc as `--include-after-body`.
    pub after: PathBuf,
    /// Pandoc filter scripts, applied in order.
    #[serde(default)]
    pub filters: Vec<PathBuf>,
    /// Whether documents with `index: true` get a synthesized sibling index.
    #[serde(default = "default_true")]
    pub make_index_files: bool,
    /// Suffix of the synthesized markdown fed to pandoc in place of an index
    /// page's own source. Must end in `.md`.
    #[serde(default = "default_index_suffix")]
    pub generated_index_suffix: String,
    /// Re-render each converted page with its front matter as template
    /// context. The key keeps its historical name from the config format.
    #[serde(default)]
    pub mustache_rerender: bool,
    /// Directory of the config file; every relative path above was resolved
    /// against it at load time.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_index_suffix() -> String {
    "._index.md".to_string()
}

impl SiteConfig {
    /// Resolve a path from config or front matter against the config file's
    /// directory. Absolute paths pass through.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        absolutize(&self.base_dir, path.as_ref())
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generated_index_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "generated_index_suffix must not be empty".into(),
            ));
        }
        if !self.generated_index_suffix.ends_with(".md") {
            return Err(ConfigError::Validation(
                "generated_index_suffix must end with .md (the generated file is fed back through pandoc)"
                    .into(),
            ));
        }
        if self.content == self.public {
            return Err(ConfigError::Validation(
                "content and public must be different directories".into(),
            ));
        }
        Ok(())
    }
}

/// Load a config file, resolving tags through `registry` and every relative
/// path against the file's directory.
pub fn load_config(path: &Path, registry: &TagRegistry) -> Result<SiteConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_yaml::from_str(&raw)?;
    let value = registry.resolve(value)?;
    let mut config: SiteConfig = serde_yaml::from_value(value)?;

    let base = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    config.content = absolutize(&base, &config.content);
    config.public = absolutize(&base, &config.public);
    config.header = absolutize(&base, &config.header);
    config.before = absolutize(&base, &config.before);
    config.after = absolutize(&base, &config.after);
    config.resources = config.resources.take().map(|p| absolutize(&base, &p));
    for filter in &mut config.filters {
        let resolved = absolutize(&base, filter);
        *filter = resolved;
    }
    config.base_dir = base;

    config.validate()?;
    Ok(config)
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
