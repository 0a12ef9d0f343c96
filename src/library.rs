//! Media library scanning and catalog generation.
//!
//! Walks an uploads directory and produces a [`JsonCatalog`] with one
//! attachment per original image and its resized variants labeled by size
//! preset.
//!
//! ## Directory Structure
//!
//! ```text
//! uploads/                         # Library root (maps to --base-url)
//! ├── 2024/
//! │   ├── hero.jpg                 # Original → attachment 1
//! │   ├── hero-150x150.jpg         # thumbnail (150x150 crop)
//! │   ├── hero-300x200.jpg         # medium (fits 300x300)
//! │   ├── hero-768x512.jpg         # medium_large (fits 768 wide)
//! │   └── hero-1024x683.jpg        # large (fits 1024x1024)
//! └── 2025/
//!     └── banner-1920x600.png      # No banner.png → treated as an original
//! ```
//!
//! ## Variant Labeling
//!
//! A `-WxH` file is a variant only if its original (same directory, same base
//! name, same extension) exists. Its label is found by computing, for every
//! configured [`SizePreset`], the dimensions that preset would produce from the
//! original, and matching within one pixel to absorb rounding differences.
//! Variants that match no preset are left out of the catalog. Originals whose
//! dimensions cannot be read get no width and no labeled variants.
//!
//! ## Ids
//!
//! Originals are numbered from 1 in relative-path order, so rescanning an
//! unchanged library yields the same ids.
//!
//! ## Parallel Processing
//!
//! Reading image headers for dimensions runs on a [rayon](https://docs.rs/rayon)
//! pool sized by [`effective_threads`].

use crate::catalog::{Attachment, AttachmentMetadata, CatalogError, JsonCatalog, SizeVariant};
use crate::config::{PluginConfig, SizePreset, effective_threads};
use crate::naming::{display_title, parse_variant_name};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Grouping key: directory, base name, lowercase extension.
type FamilyKey = (PathBuf, String, String);

#[derive(Debug)]
struct Original {
    rel_path: PathBuf,
    key: FamilyKey,
    title: String,
}

#[derive(Debug, Clone)]
struct Variant {
    file_name: String,
    dimensions: (u32, u32),
}

/// Dimensions a preset produces from an original, or `None` when the original
/// is already small enough that no variant would be generated.
pub fn expected_variant_dimensions(original: (u32, u32), preset: &SizePreset) -> Option<(u32, u32)> {
    let (orig_w, orig_h) = original;
    if orig_w == 0 || orig_h == 0 {
        return None;
    }

    if preset.crop {
        if orig_w <= preset.width && orig_h <= preset.height {
            return None;
        }
        return Some((orig_w.min(preset.width), orig_h.min(preset.height)));
    }

    let ratio_for = |max: u32, current: u32| {
        if max > 0 && current > max {
            max as f64 / current as f64
        } else {
            1.0
        }
    };
    let ratio = ratio_for(preset.width, orig_w).min(ratio_for(preset.height, orig_h));
    if ratio >= 1.0 {
        return None;
    }
    let w = ((orig_w as f64 * ratio).round() as u32).max(1);
    let h = ((orig_h as f64 * ratio).round() as u32).max(1);
    Some((w, h))
}

fn within_one_pixel(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0.abs_diff(b.0) <= 1 && a.1.abs_diff(b.1) <= 1
}

fn to_url_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Scan `root` into a catalog whose URLs are rooted at `base_url`.
pub fn scan(root: &Path, base_url: &str, config: &PluginConfig) -> Result<JsonCatalog, LibraryError> {
    if !root.is_dir() {
        return Err(LibraryError::NotADirectory(root.to_path_buf()));
    }

    // (rel_path, parsed stem, extension) for every image file
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(ext) = image_extension(path) else {
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!("skipping non-UTF-8 file name: {}", path.display());
            continue;
        };
        let rel_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        files.push((rel_path, parse_variant_name(stem), ext));
    }

    let dir_of = |rel: &Path| rel.parent().map(Path::to_path_buf).unwrap_or_default();
    let stem_of = |rel: &Path| {
        rel.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    // Every file can be an original, including one whose own name ends in -WxH
    let stems: HashSet<FamilyKey> = files
        .iter()
        .map(|(rel, _, ext)| (dir_of(rel), stem_of(rel), ext.clone()))
        .collect();

    let mut originals = Vec::new();
    let mut variants: BTreeMap<FamilyKey, Vec<Variant>> = BTreeMap::new();
    for (rel_path, parsed, ext) in files {
        let dir = dir_of(&rel_path);
        if let Some(dimensions) = parsed.dimensions {
            let family = (dir.clone(), parsed.base, ext.clone());
            if stems.contains(&family) {
                let file_name = rel_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                variants.entry(family).or_default().push(Variant {
                    file_name,
                    dimensions,
                });
                continue;
            }
        }
        let stem = stem_of(&rel_path);
        originals.push(Original {
            title: display_title(&stem),
            key: (dir, stem, ext),
            rel_path,
        });
    }
    originals.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_threads(&config.processing))
        .build()?;
    let dimensions: Vec<Option<(u32, u32)>> = pool.install(|| {
        originals
            .par_iter()
            .map(|original| {
                let path = root.join(&original.rel_path);
                match image::image_dimensions(&path) {
                    Ok(dims) => Some(dims),
                    Err(e) => {
                        log::warn!("cannot read dimensions of {}: {e}", path.display());
                        None
                    }
                }
            })
            .collect()
    });

    let base_url = base_url.trim_end_matches('/');
    let mut attachments = Vec::with_capacity(originals.len());
    for (idx, (original, dims)) in originals.iter().zip(dimensions).enumerate() {
        let family_variants = variants.get(&original.key).map(Vec::as_slice).unwrap_or(&[]);
        let sizes = label_variants(dims, family_variants, &config.image_sizes);
        log::debug!(
            "{}: {} variant(s), labels {:?}",
            original.rel_path.display(),
            family_variants.len(),
            sizes.keys().collect::<Vec<_>>()
        );

        let file = to_url_path(&original.rel_path);
        attachments.push(Attachment {
            id: idx as u64 + 1,
            url: format!("{base_url}/{file}"),
            title: original.title.clone(),
            alt: String::new(),
            metadata: AttachmentMetadata {
                width: dims.map(|d| d.0),
                height: dims.map(|d| d.1),
                file,
                sizes,
            },
        });
    }

    Ok(JsonCatalog::from_attachments(attachments)?)
}

fn label_variants(
    original: Option<(u32, u32)>,
    variants: &[Variant],
    presets: &BTreeMap<String, SizePreset>,
) -> BTreeMap<String, SizeVariant> {
    let Some(original) = original else {
        return BTreeMap::new();
    };
    presets
        .iter()
        .filter_map(|(label, preset)| {
            let expected = expected_variant_dimensions(original, preset)?;
            let variant = variants
                .iter()
                .find(|v| within_one_pixel(v.dimensions, expected))?;
            Some((
                label.clone(),
                SizeVariant {
                    file: variant.file_name.clone(),
                    width: variant.dimensions.0,
                    height: variant.dimensions.1,
                },
            ))
        })
        .collect()
}
