//! Stateless attribute editor.
//!
//! Every control in the block's settings panel maps to a function that returns
//! an [`AttributesPatch`]. Patches are applied with [`apply_patch`], which never
//! mutates its input:
//!
//! ```text
//! Background Settings   select_image(media) / remove_image()
//! Layout Settings       set_min_height(h) / set_content_align(a)
//! Overlay Settings      set_overlay_opacity(o) / set_overlay_color(c)
//! ```
//!
//! Values arrive already typed ([`MinHeight`], [`OverlayOpacity`], ...), so a
//! patch can never carry an out-of-range value.

use crate::attributes::{BlockAttributes, ContentAlign, MinHeight, OverlayColor, OverlayOpacity};
use serde::Deserialize;

/// A media item picked from the library.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaSelection {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// A partial update. `None` fields leave the attribute untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributesPatch {
    pub background_image_id: Option<u64>,
    pub background_image_url: Option<String>,
    pub background_image_alt: Option<String>,
    pub min_height: Option<MinHeight>,
    pub content_align: Option<ContentAlign>,
    pub overlay_opacity: Option<OverlayOpacity>,
    pub overlay_color: Option<OverlayColor>,
}

impl AttributesPatch {
    /// Number of attributes this patch touches.
    pub fn len(&self) -> usize {
        [
            self.background_image_id.is_some(),
            self.background_image_url.is_some(),
            self.background_image_alt.is_some(),
            self.min_height.is_some(),
            self.content_align.is_some(),
            self.overlay_opacity.is_some(),
            self.overlay_color.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Apply `patch` on top of `attributes`, returning the updated record.
pub fn apply_patch(attributes: &BlockAttributes, patch: &AttributesPatch) -> BlockAttributes {
    let mut next = attributes.clone();
    if let Some(id) = patch.background_image_id {
        next.background_image_id = id;
    }
    if let Some(url) = &patch.background_image_url {
        next.background_image_url = url.clone();
    }
    if let Some(alt) = &patch.background_image_alt {
        next.background_image_alt = alt.clone();
    }
    if let Some(h) = patch.min_height {
        next.min_height = h;
    }
    if let Some(a) = patch.content_align {
        next.content_align = a;
    }
    if let Some(o) = patch.overlay_opacity {
        next.overlay_opacity = o;
    }
    if let Some(c) = &patch.overlay_color {
        next.overlay_color = c.clone();
    }
    next
}

/// Set id, url and alt together from a media selection.
pub fn select_image(media: &MediaSelection) -> AttributesPatch {
    AttributesPatch {
        background_image_id: Some(media.id),
        background_image_url: Some(media.url.clone()),
        background_image_alt: Some(media.alt.clone()),
        ..Default::default()
    }
}

/// Reset the image attributes to their empty defaults.
pub fn remove_image() -> AttributesPatch {
    AttributesPatch {
        background_image_id: Some(0),
        background_image_url: Some(String::new()),
        background_image_alt: Some(String::new()),
        ..Default::default()
    }
}

pub fn set_min_height(value: MinHeight) -> AttributesPatch {
    AttributesPatch {
        min_height: Some(value),
        ..Default::default()
    }
}

pub fn set_content_align(value: ContentAlign) -> AttributesPatch {
    AttributesPatch {
        content_align: Some(value),
        ..Default::default()
    }
}

pub fn set_overlay_opacity(value: OverlayOpacity) -> AttributesPatch {
    AttributesPatch {
        overlay_opacity: Some(value),
        ..Default::default()
    }
}

pub fn set_overlay_color(value: OverlayColor) -> AttributesPatch {
    AttributesPatch {
        overlay_color: Some(value),
        ..Default::default()
    }
}
