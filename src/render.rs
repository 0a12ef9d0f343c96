//! Saved markup and render-time injection for the hero background block.
//!
//! ## Saved Markup
//!
//! [`save`] serializes attributes to the static HTML stored with the page:
//!
//! ```html
//! <div class="wp-block-webvitals-blocks-hero-background hero-background-block"
//!      style="min-height:500px;align-items:center"
//!      data-bg-image-id="42" data-bg-image-url="https://…/hero.jpg">
//!   <div class="hero-background-image" style="background-image:url(…);…"
//!        data-bg-image-id="42" role="img" aria-label="…"></div>
//!   <div class="hero-background-overlay" style="background-color:#000000;opacity:0.5"></div>
//!   <div class="hero-background-content">…nested blocks…</div>
//! </div>
//! ```
//!
//! The root element carries the image id and URL so [`recover_image`] can read
//! them back from stored markup alone.
//!
//! ## Render-Time Injection
//!
//! [`render_hero`] runs on every page render. When the block has an image and
//! the resolver finds at least one srcset candidate, it appends an inline
//! script (`static/responsive-background.js`) that lets the browser choose a
//! candidate through an offscreen `<img>` and copies the chosen URL into the
//! background. Otherwise the markup passes through untouched.
//!
//! ## Escaping
//!
//! HTML output goes through [maud](https://maud.lambda.xyz/), which escapes all
//! interpolation. The four values embedded in the script are JS string
//! literals built by [`escape_js`], which also neutralizes `</script>`.

use crate::attributes::BlockAttributes;
use crate::catalog::MediaCatalog;
use crate::resolver::{ResponsiveBackground, resolve};
use maud::{Markup, PreEscaped, html};

/// Class the host adds to every instance of this block type.
pub const BLOCK_CLASS: &str = "wp-block-webvitals-blocks-hero-background";

const SCRIPT: &str = include_str!("../static/responsive-background.js");

/// Image reference recovered from saved markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedImage {
    pub id: u64,
    pub url: String,
}

/// Serialize a block to its saved markup. `inner_html` is inserted verbatim.
pub fn save(attributes: &BlockAttributes, inner_html: &str) -> Markup {
    let root_style = format!(
        "min-height:{};align-items:{}",
        attributes.min_height, attributes.content_align
    );
    let id_attr = if attributes.has_image() {
        attributes.background_image_id.to_string()
    } else {
        String::new()
    };
    let url = &attributes.background_image_url;
    let image_style = format!(
        "background-image:url({});background-size:cover;background-position:center",
        css_string(url)
    );
    let overlay_style = format!(
        "background-color:{};opacity:{}",
        attributes.overlay_color, attributes.overlay_opacity
    );

    html! {
        div class={ (BLOCK_CLASS) " hero-background-block" }
            style=(root_style)
            data-bg-image-id=(id_attr)
            data-bg-image-url=(url) {
            @if !url.is_empty() {
                div.hero-background-image
                    style=(image_style)
                    data-bg-image-id=(attributes.background_image_id)
                    role="img"
                    aria-label=(attributes.background_image_alt) {}
            }
            @if attributes.overlay_opacity.is_visible() {
                div.hero-background-overlay style=(overlay_style) {}
            }
            div.hero-background-content {
                (PreEscaped(inner_html))
            }
        }
    }
}

/// Render callback: append the responsive background script when it applies.
pub fn render_hero<C, S>(
    content: &str,
    attributes: &BlockAttributes,
    catalog: &C,
    size_labels: &[S],
) -> String
where
    C: MediaCatalog + ?Sized,
    S: AsRef<str>,
{
    if !attributes.has_image() {
        return content.to_string();
    }
    let background = resolve(catalog, attributes.background_image_id, size_labels);
    if !background.has_candidates() {
        log::debug!(
            "image {}: no srcset candidates, markup left unchanged",
            attributes.background_image_id
        );
        return content.to_string();
    }
    let mut rendered = String::with_capacity(content.len() + SCRIPT.len() + 256);
    rendered.push_str(content);
    rendered.push_str(&background_script(attributes.background_image_id, &background));
    rendered
}

/// The inline `<script>` applying `background` to elements tagged `image_id`.
pub fn background_script(image_id: u64, background: &ResponsiveBackground) -> String {
    format!(
        "<script>{}({image_id}, \"{}\", \"{}\", \"{}\");</script>",
        SCRIPT.trim_end(),
        escape_js(&background.srcset),
        escape_js(&background.sizes),
        escape_js(&background.src),
    )
}

/// Escape a string for use inside a double- or single-quoted JS literal that is
/// itself inside an inline `<script>` element.
pub fn escape_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Quote a value as a CSS string so it cannot close `url(...)` early.
fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' | '\u{c}' => out.push_str(&format!("\\{:x} ", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Read the image id and URL back from the root element of saved markup.
///
/// Leading HTML comments (block delimiters) are skipped. Returns `None` when
/// the root element does not carry `data-bg-image-id` or the id is malformed;
/// an empty id means "no image" and yields id 0.
pub fn recover_image(markup: &str) -> Option<PersistedImage> {
    let tag = root_tag(markup)?;
    let raw_id = attribute_value(tag, "data-bg-image-id")?;
    let id = if raw_id.trim().is_empty() {
        0
    } else {
        raw_id.trim().parse().ok()?
    };
    let url = attribute_value(tag, "data-bg-image-url")
        .map(unescape_html)
        .unwrap_or_default();
    Some(PersistedImage { id, url })
}

fn root_tag(markup: &str) -> Option<&str> {
    let mut rest = markup;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            let end = comment.find("-->")?;
            rest = &comment[end + 3..];
            continue;
        }
        let end = rest.find('>')?;
        return Some(&rest[..end]);
    }
}

fn attribute_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

fn unescape_html(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
