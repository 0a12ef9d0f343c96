//! Shared test utilities for the webvitals-blocks test suite.
//!
//! Provides a scriptable [`StubCatalog`] whose URLs and widths can be set
//! independently (the JSON catalog always pairs them), a lookup counter, and
//! an image writer for library scans.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = StubCatalog::new()
//!     .size(42, "medium", "url_m", Some(400))
//!     .size(42, "full", "url_f", None)
//!     .overall_width(42, 1600);
//! ```

use crate::catalog::{AttachmentMetadata, MediaCatalog, SizeVariant};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

// =========================================================================
// Fixture images
// =========================================================================

/// Write a blank PNG of the given size, creating parent directories.
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::new(width, height).save(path).unwrap();
}

// =========================================================================
// Catalog doubles
// =========================================================================

#[derive(Debug, Default, Clone)]
struct StubImage {
    urls: BTreeMap<String, String>,
    metadata: AttachmentMetadata,
}

/// In-memory catalog where every URL and width is set explicitly.
#[derive(Debug, Default, Clone)]
pub struct StubCatalog {
    images: BTreeMap<u64, StubImage>,
    lookups: std::sync::Arc<AtomicUsize>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `size` for `id` with a URL and an optional recorded width.
    pub fn size(mut self, id: u64, size: &str, url: &str, width: Option<u32>) -> Self {
        let image = self.images.entry(id).or_default();
        image.urls.insert(size.to_string(), url.to_string());
        if let Some(width) = width {
            image.metadata.sizes.insert(
                size.to_string(),
                SizeVariant {
                    file: url.to_string(),
                    width,
                    height: width,
                },
            );
        }
        self
    }

    /// Record a width for `size` without any URL.
    pub fn width_only(mut self, id: u64, size: &str, width: u32) -> Self {
        self.images.entry(id).or_default().metadata.sizes.insert(
            size.to_string(),
            SizeVariant {
                file: String::new(),
                width,
                height: width,
            },
        );
        self
    }

    /// Set the intrinsic width of the original.
    pub fn overall_width(mut self, id: u64, width: u32) -> Self {
        self.images.entry(id).or_default().metadata.width = Some(width);
        self
    }

    /// Total number of `image_url` + `metadata` calls so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl MediaCatalog for StubCatalog {
    fn image_url(&self, image_id: u64, size: &str) -> Option<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.images.get(&image_id)?.urls.get(size).cloned()
    }

    fn metadata(&self, image_id: u64) -> Option<AttachmentMetadata> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.images.get(&image_id).map(|i| i.metadata.clone())
    }
}

/// The catalog from the medium/large/full scenario: image 42 at 400/800/1600.
pub fn hero_catalog() -> StubCatalog {
    StubCatalog::new()
        .size(42, "medium", "url_m", Some(400))
        .size(42, "large", "url_l", Some(800))
        .size(42, "full", "url_f", Some(1600))
}
