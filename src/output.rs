//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable) and
//! a `print_*` wrapper that writes them to stdout.
//!
//! ## Scan
//!
//! ```text
//! Attachments
//! 001 hero (1200x800)
//!     Source: 2024/hero.png
//!     large: hero-1024x683.png (1024w)
//!     medium: hero-300x200.png (300w)
//! 002 banner 1920x600 (40x20)
//!     Source: banner-1920x600.png
//!
//! Scanned 2 attachments, 2 sized variants
//! ```
//!
//! ## Resolve
//!
//! ```text
//! Image 42
//!     srcset: url_m 400w, url_l 800w, url_f 1600w
//!     sizes: 100vw
//!     src: url_f
//! ```

use crate::catalog::{Attachment, JsonCatalog};
use crate::resolver::ResponsiveBackground;

/// Format a positional index as 3-digit zero-padded.
fn format_index(pos: u64) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn attachment_header(attachment: &Attachment) -> String {
    let title = if attachment.title.is_empty() {
        format!("({})", attachment.metadata.file)
    } else {
        attachment.title.clone()
    };
    let dims = match (attachment.metadata.width, attachment.metadata.height) {
        (Some(w), Some(h)) => format!("{w}x{h}"),
        (Some(w), None) => format!("{w}w"),
        _ => "dimensions unknown".to_string(),
    };
    format!("{} {} ({})", format_index(attachment.id), title, dims)
}

/// Lines describing every attachment in a scanned catalog.
pub fn format_scan_output(catalog: &JsonCatalog) -> Vec<String> {
    let mut lines = vec!["Attachments".to_string()];
    let mut variant_count = 0;
    for attachment in catalog.attachments() {
        lines.push(attachment_header(attachment));
        lines.push(format!("{}Source: {}", indent(1), attachment.metadata.file));
        for (label, variant) in &attachment.metadata.sizes {
            variant_count += 1;
            lines.push(format!(
                "{}{}: {} ({}w)",
                indent(1),
                label,
                variant.file,
                variant.width
            ));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "Scanned {} attachment{}, {} sized variant{}",
        catalog.len(),
        plural(catalog.len()),
        variant_count,
        plural(variant_count)
    ));
    lines
}

/// Lines describing a resolved background.
pub fn format_resolve_output(image_id: u64, background: &ResponsiveBackground) -> Vec<String> {
    let show = |value: &str| {
        if value.is_empty() {
            "(none)".to_string()
        } else {
            value.to_string()
        }
    };
    vec![
        format!("Image {image_id}"),
        format!("{}srcset: {}", indent(1), show(&background.srcset)),
        format!("{}sizes: {}", indent(1), show(&background.sizes)),
        format!("{}src: {}", indent(1), show(&background.src)),
    ]
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn print_scan_output(catalog: &JsonCatalog) {
    for line in format_scan_output(catalog) {
        println!("{}", line);
    }
}

pub fn print_resolve_output(image_id: u64, background: &ResponsiveBackground) {
    for line in format_resolve_output(image_id, background) {
        println!("{}", line);
    }
}
