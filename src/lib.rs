//! # pansite
//!
//! A minimal static site generator that glues pandoc, YAML front matter, and
//! tera templates. Your content directory is the data source: every markdown
//! file opens with a front-matter block, pandoc turns bodies into HTML, and
//! two optional template passes handle the rest — index pages aggregate their
//! siblings' front matter, and converted pages can be re-rendered with their
//! own front matter as context.
//!
//! # Architecture: One Pass Per Page
//!
//! ```text
//! content/*.md ──parse──▶ Document ──[index?]──▶ synthesized *._index.md
//!                                        │
//!                                        ▼
//!                                  pandoc (markdown → html5)
//!                                        │
//!                                        ▼
//!                            [rerender?] tera over output
//!                                        │
//!                                        ▼
//!                                  public/*.html
//! ```
//!
//! Pages are independent: each one is parsed, converted, and written before
//! the next begins. The single coupling between files is index synthesis,
//! which reads the front matter of sibling documents — and the driver takes
//! its snapshot of content files before any generation starts, so synthesized
//! intermediates never feed back into the build.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | YAML build configuration: anchors + `!join`, path resolution, validation |
//! | [`decode`] | YAML decoding with a registry of custom-tag handlers |
//! | [`document`] | Front-matter document model — parse, mutate, serialize |
//! | [`render`] | Logic-less template expansion via tera |
//! | [`index`] | Index page synthesis from sibling front matter |
//! | [`pandoc`] | External converter invocation |
//! | [`generate`] | Per-page orchestration and the build driver |
//!
//! # Design Decisions
//!
//! ## Pandoc Owns Markup
//!
//! pansite never interprets markdown itself. Bodies go to a `pandoc`
//! subprocess with a fixed argument shape (include files, `--mathjax`,
//! `-f markdown -t html5`, filter chain). This keeps the tool honest about
//! what it is — plumbing — and means every pandoc extension, filter, and
//! output quirk works exactly as it does on the command line.
//!
//! ## Front Matter Is the Only Metadata
//!
//! There is no database, no separate manifest, no per-site taxonomy file.
//! A document's YAML block is all the structured data it has, and everything
//! in it flows through to templates untouched. The two keys pansite itself
//! reads are `index` (marks a page that aggregates its siblings) and
//! `template_file` (an external fragment appended to an index body).
//!
//! ## Templates Are an Injected Capability
//!
//! Rendering is variable substitution and sequence iteration over a context,
//! nothing more. [`render`] wraps tera's one-off API behind a single
//! function, so neither the index generator nor the rerender pass knows which
//! engine is underneath. Render errors are fatal: a page with an unresolvable
//! placeholder fails the build instead of shipping half-expanded output.
//!
//! ## Sequential By Design
//!
//! Pages are converted one at a time, in sorted order, blocking on each
//! pandoc invocation. An offline batch build has no availability story to
//! protect; determinism and a readable failure (one file, one diagnostic) are
//! worth more than wall-clock time on sites of this size.
//!
//! ## No Build Cache
//!
//! Every run converts every page. Incremental builds would need content
//! hashing plus dependency tracking between index pages and their siblings —
//! real complexity for a tool whose full build is a few seconds of pandoc.

pub mod config;
pub mod decode;
pub mod document;
pub mod generate;
pub mod index;
pub mod pandoc;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
