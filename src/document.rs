//! Front-matter document model.
//!
//! A content file is a YAML metadata block fenced by a delimiter line,
//! followed by a free-form markdown body:
//!
//! ```text
//! ---
//! title: Hello
//! index: true
//! ---
//! Hello body.
//! ```
//!
//! Parsing splits on every occurrence of the delimiter but only the first two
//! splits are structural: everything from the third segment on is body text,
//! rejoined verbatim, so a horizontal rule spelled `---` inside the body
//! survives the round trip.
//!
//! Front matter is opaque template context except for two keys the generator
//! reads itself: `index` marks a page that aggregates its siblings, and
//! `template_file` names an external fragment appended to an index body.

use crate::decode::{self, DecodeError, TagRegistry};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The conventional front-matter fence.
pub const DEFAULT_DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("document does not open with `{delimiter}` (found {found:?} at start of file)")]
    Malformed { delimiter: String, found: String },
    #[error("missing `{delimiter}` delimiters: need an opening and a closing fence")]
    MissingDelimiters { delimiter: String },
    #[error("front matter: {0}")]
    Decode(#[from] DecodeError),
    #[error("front matter encoding: {0}")]
    Encode(#[source] serde_yaml::Error),
}

/// A parsed content file: ordered front-matter mapping plus raw body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: Mapping,
    pub body: String,
}

impl Document {
    /// Parse `raw` into front matter and body.
    ///
    /// The text must open with the delimiter (leading whitespace tolerated)
    /// and fence the metadata block with a second one; anything less is
    /// malformed. The body may be empty.
    pub fn parse(raw: &str, delimiter: &str, tags: &TagRegistry) -> Result<Self, DocumentError> {
        let sections: Vec<&str> = raw.split(delimiter).collect();

        if !sections[0].trim().is_empty() {
            return Err(DocumentError::Malformed {
                delimiter: delimiter.to_string(),
                found: truncate(sections[0], 80),
            });
        }
        if sections.len() < 3 {
            return Err(DocumentError::MissingDelimiters {
                delimiter: delimiter.to_string(),
            });
        }

        let metadata = decode::decode_mapping(sections[1], tags)?;
        // Only the first two splits are structural; re-join the rest so
        // delimiter-looking text inside the body stays literal.
        let body = sections[2..].join(delimiter);

        Ok(Self { metadata, body })
    }

    /// Read and parse a file. The error names the path on a missing or
    /// unreadable file.
    pub fn load(path: &Path, delimiter: &str, tags: &TagRegistry) -> Result<Self, DocumentError> {
        let raw = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, delimiter, tags)
    }

    /// Serialize back to fenced text: delimiter, encoded metadata, delimiter,
    /// body. Metadata keeps its insertion order; the body is emitted with
    /// leading whitespace stripped.
    pub fn to_text(&self, delimiter: &str) -> Result<String, DocumentError> {
        let metadata = serde_yaml::to_string(&self.metadata).map_err(DocumentError::Encode)?;
        Ok(format!(
            "{delimiter}\n{}\n{delimiter}\n{}",
            metadata.trim_end(),
            self.body.trim_start()
        ))
    }

    /// Whether the front matter carries `index: true`.
    pub fn is_index(&self) -> bool {
        matches!(self.metadata.get("index"), Some(Value::Bool(true)))
    }

    /// The `template_file` key, if present and a string.
    pub fn template_file(&self) -> Option<&str> {
        self.metadata.get("template_file").and_then(Value::as_str)
    }
}

fn truncate(text: &str, max: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max) {
        Some((byte, _)) => format!("{}…", &trimmed[..byte]),
        None => trimmed.to_string(),
    }
}
