//! Logic-less template expansion.
//!
//! The generator needs exactly two template features: variable substitution
//! (`{{ title }}`) and sequence iteration (`{% for child in children %}`).
//! Tera provides both through its one-off API, and this module is the only
//! place that knows it — callers hand over a template string and a context
//! and get expanded text back.
//!
//! Autoescaping is off: inputs are markdown and pandoc-produced HTML, and
//! escaping either would corrupt it. Render failures — a syntax error in the
//! template, a placeholder with no value — are returned, never papered over
//! with the unrendered text.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Expand `template` against `context`.
pub fn render(template: &str, context: &Context) -> Result<String, RenderError> {
    Ok(Tera::one_off(template, context, false)?)
}

/// Build a context whose top-level variables are the fields of `value`
/// (typically a front-matter mapping).
pub fn context_from<T: Serialize>(value: &T) -> Result<Context, RenderError> {
    Ok(Context::from_serialize(value)?)
}
