//! Filename parsing for the `name-WxH` variant convention.
//!
//! When an image is uploaded, each size preset produces a resized copy next to
//! the original, named after it with the output dimensions appended:
//!
//! ```text
//! uploads/2024/
//! ├── hero.jpg              # original
//! ├── hero-150x150.jpg      # thumbnail (cropped)
//! ├── hero-300x200.jpg      # medium
//! └── hero-1024x683.jpg     # large
//! ```
//!
//! [`parse_variant_name`] splits a file stem into the original's stem and the
//! optional `(width, height)` suffix. Whether a suffixed file really is a
//! variant depends on whether its original exists, which the
//! [`library`](crate::library) scanner decides.

/// Result of parsing a file stem like `hero-1024x683`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Stem with any `-WxH` suffix removed.
    pub base: String,
    /// Dimensions from the suffix, if present.
    pub dimensions: Option<(u32, u32)>,
}

/// Parse a file stem following the `name-WxH` convention.
///
/// - `"hero-1024x683"` → base="hero", dimensions=Some((1024, 683))
/// - `"my-hero-300x200"` → base="my-hero", dimensions=Some((300, 200))
/// - `"hero"` → base="hero", dimensions=None
/// - `"hero-2x"` → base="hero-2x", dimensions=None
/// - `"1024x683"` → base="1024x683", dimensions=None (no base to attach to)
pub fn parse_variant_name(stem: &str) -> ParsedName {
    if let Some(dash_pos) = stem.rfind('-') {
        let base = &stem[..dash_pos];
        if !base.is_empty()
            && let Some(dimensions) = parse_dimensions(&stem[dash_pos + 1..])
        {
            return ParsedName {
                base: base.to_string(),
                dimensions: Some(dimensions),
            };
        }
    }
    ParsedName {
        base: stem.to_string(),
        dimensions: None,
    }
}

fn parse_dimensions(suffix: &str) -> Option<(u32, u32)> {
    let (w, h) = suffix.split_once('x')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(w) || !all_digits(h) {
        return None;
    }
    let width = w.parse::<u32>().ok().filter(|&n| n > 0)?;
    let height = h.parse::<u32>().ok().filter(|&n| n > 0)?;
    Some((width, height))
}

/// Human-readable title for a file stem: dashes and underscores become spaces.
pub fn display_title(stem: &str) -> String {
    stem.replace(['-', '_'], " ")
}
