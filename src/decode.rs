//! YAML decoding with a registry of custom-tag handlers.
//!
//! Config files and front-matter blocks are plain YAML plus application tags.
//! Tags are not hard-wired into any call site: they live in a [`TagRegistry`]
//! mapping tag names to handler functions, and [`TagRegistry::resolve`] walks
//! a parsed value tree replacing every tagged node with its handler's output.
//! The result is always plain strings, sequences, and mappings — downstream
//! code never sees a tag.
//!
//! ## The `!join` tag
//!
//! The one built-in handler. Concatenates a sequence of scalars into a single
//! string, which combined with YAML anchors lets a config file assemble paths
//! from reusable fragments:
//!
//! ```yaml
//! resources: &RESOURCES_DIR "./resources/"
//! header: !join [*RESOURCES_DIR, "header.html"]   # "./resources/header.html"
//! ```

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no handler registered for tag !{0}")]
    UnknownTag(String),
    #[error("!{tag} expects {expected}, found {found}")]
    BadTagInput {
        tag: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// A tag handler receives the already-resolved inner value and produces the
/// plain value that replaces the tagged node.
pub type TagHandler = fn(&Value) -> Result<Value, DecodeError>;

/// Named handler registry for custom YAML tags.
///
/// Tag names are stored without the leading `!`; lookups normalize the same
/// way, so `!join` and `join` refer to the same handler.
pub struct TagRegistry {
    handlers: BTreeMap<String, TagHandler>,
}

impl TagRegistry {
    /// An empty registry: any tagged value is a decode error.
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry with the built-in `!join` handler.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("join", join);
        registry
    }

    /// Register a handler under `name` (leading `!` optional). Replaces any
    /// existing handler of the same name.
    pub fn register(&mut self, name: &str, handler: TagHandler) {
        self.handlers
            .insert(name.trim_start_matches('!').to_string(), handler);
    }

    /// Recursively replace every tagged node in `value` with its handler's
    /// output. Handlers run innermost-first, so a tag's input is already
    /// plain data.
    pub fn resolve(&self, value: Value) -> Result<Value, DecodeError> {
        match value {
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                let name = tag.to_string();
                let name = name.trim_start_matches('!');
                let handler = self
                    .handlers
                    .get(name)
                    .ok_or_else(|| DecodeError::UnknownTag(name.to_string()))?;
                let inner = self.resolve(value)?;
                handler(&inner)
            }
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Value::Mapping(mapping) => {
                let mut resolved = Mapping::with_capacity(mapping.len());
                for (key, value) in mapping {
                    resolved.insert(self.resolve(key)?, self.resolve(value)?);
                }
                Ok(Value::Mapping(resolved))
            }
            scalar => Ok(scalar),
        }
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Parse a YAML fragment and resolve its tags, requiring a mapping at the top
/// level. An empty or whitespace-only fragment decodes to the empty mapping.
pub fn decode_mapping(text: &str, registry: &TagRegistry) -> Result<Mapping, DecodeError> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(text)?;
    match registry.resolve(value)? {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(DecodeError::NotAMapping(kind(&other))),
    }
}

/// `!join`: concatenate a sequence of scalars into one string.
fn join(value: &Value) -> Result<Value, DecodeError> {
    let Value::Sequence(items) = value else {
        return Err(DecodeError::BadTagInput {
            tag: "join".into(),
            expected: "a sequence of scalars",
            found: kind(value),
        });
    };
    let mut joined = String::new();
    for item in items {
        match item {
            Value::String(s) => joined.push_str(s),
            Value::Number(n) => joined.push_str(&n.to_string()),
            Value::Bool(b) => joined.push_str(if *b { "true" } else { "false" }),
            other => {
                return Err(DecodeError::BadTagInput {
                    tag: "join".into(),
                    expected: "a sequence of scalars",
                    found: kind(other),
                });
            }
        }
    }
    Ok(Value::String(joined))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
