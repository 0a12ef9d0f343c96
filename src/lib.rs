//! # WebVitals Blocks
//!
//! A hero background content block: a full-width section with a background
//! image, a colored overlay and nested content, whose background is served
//! responsively even though CSS backgrounds have no `srcset`.
//!
//! # Architecture: Edit, Save, Render
//!
//! A block instance moves through three independent steps:
//!
//! ```text
//! 1. Edit     attributes + patch  →  attributes      (pure, immutable updates)
//! 2. Save     attributes + inner  →  saved markup    (static HTML, stored with the page)
//! 3. Render   saved markup        →  page markup     (resolver + inline script)
//! ```
//!
//! Saved markup never depends on the media library, so it stays valid when
//! sizes are regenerated. Everything size-dependent happens at render time,
//! against whatever the [`catalog`] knows right now.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`attributes`] | Block attribute record and its value types (`MinHeight`, `OverlayOpacity`, ...) |
//! | [`editor`] | Patch operations the editing UI applies to attributes |
//! | [`catalog`] | `MediaCatalog` trait and the JSON-backed catalog |
//! | [`naming`] | `name-WxH` variant filename parser |
//! | [`library`] | Scans an uploads directory into a catalog |
//! | [`resolver`] | Computes `srcset` / `sizes` / `src` for one image |
//! | [`render`] | Saved markup (Maud), markup recovery, render-time script injection |
//! | [`registry`] | Block definitions, registry and the `register_blocks` composition root |
//! | [`config`] | `config.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Registration
//!
//! There are no global hooks. The binary builds a
//! [`BlockRegistry`](registry::BlockRegistry), calls
//! [`register_blocks`](registry::register_blocks) once, and passes a
//! [`RenderContext`](registry::RenderContext) holding the catalog into every
//! render. Tests do the same with stub catalogs.
//!
//! ## Degrade, Don't Fail
//!
//! A missing image, size or width is never an error at render time: the
//! resolver drops that candidate, and when no candidate is left the saved
//! markup is returned unchanged. The page always renders.
//!
//! ## Browser Picks the Candidate
//!
//! The injected script loads an offscreen `<img>` with the computed `srcset`
//! and `sizes`, then copies `currentSrc` into the background. The selection
//! logic (viewport width, device pixel ratio, cache) stays in the browser.

pub mod attributes;
pub mod catalog;
pub mod config;
pub mod editor;
pub mod library;
pub mod naming;
pub mod output;
pub mod registry;
pub mod render;
pub mod resolver;

#[cfg(test)]
pub(crate) mod test_helpers;
