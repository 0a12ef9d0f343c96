//! Responsive background resolution.
//!
//! CSS backgrounds have no `srcset`. To let the browser still choose an
//! appropriately sized hero image, the render stage hands it an offscreen probe
//! image carrying the candidates computed here, then copies the chosen URL into
//! the element's background (see [`render`](crate::render)).
//!
//! ## Algorithm
//!
//! ```text
//! resolve(42, ["medium", "large", "full"])
//!
//!   src    ← url(42, "full")
//!   for each label, in order:
//!     url   ← url(42, label)                 skip label if absent
//!     width ← sizes[label].width             else, for "full" only,
//!             metadata.width                 the original's width
//!     push "<url> <width>w"                  skip label if no width
//!
//!   srcset = "url_m 400w, url_l 800w, url_f 1600w"
//!   sizes  = "100vw"
//! ```
//!
//! Candidates are neither sorted nor deduplicated: the output follows the
//! label order exactly, even when two labels resolve to the same file.
//!
//! Resolution never fails. An unknown image gives empty `src` and `srcset`, a
//! missing size or width just drops that candidate. So does a URL with a
//! scheme other than http(s).

use crate::catalog::{AttachmentMetadata, FULL_SIZE, MediaCatalog};
use rayon::prelude::*;
use serde::Serialize;

/// Hero images always span the viewport.
pub const SIZES_HINT: &str = "100vw";

/// Labels used when no configuration says otherwise.
pub const DEFAULT_SIZE_LABELS: [&str; 3] = ["medium", "large", FULL_SIZE];

/// Result of resolving one background image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponsiveBackground {
    /// Comma-separated `"<url> <width>w"` candidates, in label order.
    pub srcset: String,
    /// `"100vw"`, or empty for the no-image result.
    pub sizes: String,
    /// Fallback URL of the original upload.
    pub src: String,
}

impl ResponsiveBackground {
    pub fn has_candidates(&self) -> bool {
        !self.srcset.is_empty()
    }
}

/// Resolve `image_id` against `catalog`, one label at a time.
pub fn resolve<C, S>(catalog: &C, image_id: u64, size_labels: &[S]) -> ResponsiveBackground
where
    C: MediaCatalog + ?Sized,
    S: AsRef<str>,
{
    if image_id == 0 {
        return ResponsiveBackground::default();
    }
    let metadata = catalog.metadata(image_id);
    let candidates: Vec<String> = size_labels
        .iter()
        .filter_map(|label| candidate(catalog, image_id, label.as_ref(), metadata.as_ref()))
        .collect();
    finish(catalog, image_id, candidates)
}

/// Same as [`resolve`], with the per-label lookups issued concurrently.
///
/// Candidate order still follows `size_labels`: results are collected by
/// index, not by completion.
pub fn resolve_parallel<C, S>(catalog: &C, image_id: u64, size_labels: &[S]) -> ResponsiveBackground
where
    C: MediaCatalog + ?Sized,
    S: AsRef<str> + Sync,
{
    if image_id == 0 {
        return ResponsiveBackground::default();
    }
    let metadata = catalog.metadata(image_id);
    let candidates: Vec<Option<String>> = size_labels
        .par_iter()
        .map(|label| candidate(catalog, image_id, label.as_ref(), metadata.as_ref()))
        .collect();
    finish(catalog, image_id, candidates.into_iter().flatten().collect())
}

fn finish<C>(catalog: &C, image_id: u64, candidates: Vec<String>) -> ResponsiveBackground
where
    C: MediaCatalog + ?Sized,
{
    let src = catalog
        .image_url(image_id, FULL_SIZE)
        .and_then(|url| srcset_url(&url))
        .unwrap_or_default();
    log::debug!(
        "image {image_id}: {} srcset candidate(s), src {:?}",
        candidates.len(),
        src
    );
    ResponsiveBackground {
        srcset: candidates.join(", "),
        sizes: SIZES_HINT.to_string(),
        src,
    }
}

fn candidate<C>(
    catalog: &C,
    image_id: u64,
    label: &str,
    metadata: Option<&AttachmentMetadata>,
) -> Option<String>
where
    C: MediaCatalog + ?Sized,
{
    let url = srcset_url(&catalog.image_url(image_id, label)?)?;
    let width = metadata.and_then(|meta| {
        meta.size_width(label)
            .or_else(|| if label == FULL_SIZE { meta.width } else { None })
    });
    match width {
        Some(width) => Some(format!("{url} {width}w")),
        None => {
            log::debug!("image {image_id}: no width for size '{label}', candidate dropped");
            None
        }
    }
}

/// Schemes a background URL may carry. Relative URLs have none.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Make a URL safe to use as a single srcset token, or reject it.
///
/// Whitespace separates a candidate's URL from its descriptor, so spaces are
/// percent-encoded. Characters outside the URL set are dropped, and a URL
/// whose scheme is not http(s) is rejected (`javascript:`, `data:`, ...).
fn srcset_url(url: &str) -> Option<String> {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            ' ' => out.push_str("%20"),
            c if is_url_char(c) => out.push(c),
            _ => {}
        }
    }
    if out.is_empty() {
        return None;
    }
    if let Some((scheme, _)) = out.split_once(':')
        && !scheme.contains(['/', '?', '#'])
        && !ALLOWED_SCHEMES.iter().any(|allowed| scheme.eq_ignore_ascii_case(allowed))
    {
        log::debug!("rejected URL with scheme '{scheme}'");
        return None;
    }
    Some(out)
}

fn is_url_char(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || "-~+_.?#=!&;,/:%@$|*'()[]".contains(c)
    } else {
        !c.is_control()
    }
}
