//! Block attribute model for the hero background block.
//!
//! One [`BlockAttributes`] record exists per block instance. It is created with
//! defaults when the block is inserted, changed through the patch operations in
//! [`editor`](crate::editor), and persisted as JSON (camelCase keys) alongside
//! the saved markup.
//!
//! ## Value Sets
//!
//! | Field | Values |
//! |-------|--------|
//! | `minHeight` | `300px`, `400px`, `500px`, `600px`, `100vh` |
//! | `contentAlign` | `flex-start`, `center`, `flex-end` |
//! | `overlayOpacity` | `0.0` – `1.0` in steps of `0.1` |
//! | `overlayColor` | `#rgb`, `#rrggbb`, `#rrggbbaa` |
//!
//! Invalid values cannot be represented: the enums only parse their own tokens,
//! opacity is clamped and snapped on construction, and colors are validated
//! before they become an [`OverlayColor`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("unknown min height '{0}' (expected one of 300px, 400px, 500px, 600px, 100vh)")]
    UnknownMinHeight(String),
    #[error("unknown content alignment '{0}' (expected flex-start, center or flex-end)")]
    UnknownContentAlign(String),
    #[error("invalid overlay color '{0}' (expected #rgb, #rrggbb or #rrggbbaa)")]
    InvalidColor(String),
}

/// Minimum height of the hero section, as a CSS length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MinHeight {
    #[serde(rename = "300px")]
    Px300,
    #[serde(rename = "400px")]
    Px400,
    #[default]
    #[serde(rename = "500px")]
    Px500,
    #[serde(rename = "600px")]
    Px600,
    #[serde(rename = "100vh")]
    FullViewport,
}

impl MinHeight {
    pub const ALL: [MinHeight; 5] = [
        MinHeight::Px300,
        MinHeight::Px400,
        MinHeight::Px500,
        MinHeight::Px600,
        MinHeight::FullViewport,
    ];

    pub fn as_css(&self) -> &'static str {
        match self {
            MinHeight::Px300 => "300px",
            MinHeight::Px400 => "400px",
            MinHeight::Px500 => "500px",
            MinHeight::Px600 => "600px",
            MinHeight::FullViewport => "100vh",
        }
    }
}

impl fmt::Display for MinHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

impl FromStr for MinHeight {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MinHeight::ALL
            .into_iter()
            .find(|h| h.as_css() == s)
            .ok_or_else(|| AttributeError::UnknownMinHeight(s.to_string()))
    }
}

/// Vertical placement of the nested content (CSS `align-items`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentAlign {
    FlexStart,
    #[default]
    Center,
    FlexEnd,
}

impl ContentAlign {
    pub const ALL: [ContentAlign; 3] = [
        ContentAlign::FlexStart,
        ContentAlign::Center,
        ContentAlign::FlexEnd,
    ];

    pub fn as_css(&self) -> &'static str {
        match self {
            ContentAlign::FlexStart => "flex-start",
            ContentAlign::Center => "center",
            ContentAlign::FlexEnd => "flex-end",
        }
    }
}

impl fmt::Display for ContentAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

impl FromStr for ContentAlign {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentAlign::ALL
            .into_iter()
            .find(|a| a.as_css() == s)
            .ok_or_else(|| AttributeError::UnknownContentAlign(s.to_string()))
    }
}

/// Overlay opacity in `[0.0, 1.0]`, snapped to steps of `0.1`.
///
/// Any `f64` converts: out-of-range values are clamped, `NaN` becomes `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct OverlayOpacity(f64);

impl OverlayOpacity {
    pub const STEP: f64 = 0.1;

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        // Tenths are counted as integers so 3 steps is exactly 0.3
        let tenths = (value.clamp(0.0, 1.0) * 10.0).round();
        Self(tenths / 10.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether the overlay element is rendered at all.
    pub fn is_visible(&self) -> bool {
        self.0 > 0.0
    }
}

impl Default for OverlayOpacity {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f64> for OverlayOpacity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<OverlayOpacity> for f64 {
    fn from(opacity: OverlayOpacity) -> Self {
        opacity.0
    }
}

impl fmt::Display for OverlayOpacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hex overlay color as emitted by the color picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OverlayColor(String);

impl OverlayColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for OverlayColor {
    fn default() -> Self {
        Self("#000000".to_string())
    }
}

impl FromStr for OverlayColor {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s
            .strip_prefix('#')
            .filter(|hex| matches!(hex.len(), 3 | 6 | 8))
            .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(AttributeError::InvalidColor(s.to_string()))
        }
    }
}

impl TryFrom<String> for OverlayColor {
    type Error = AttributeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OverlayColor> for String {
    fn from(color: OverlayColor) -> Self {
        color.0
    }
}

impl fmt::Display for OverlayColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Attributes of one hero background block instance.
///
/// `background_image_id == 0` means no image; the url and alt are then empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockAttributes {
    pub background_image_id: u64,
    pub background_image_url: String,
    pub background_image_alt: String,
    pub min_height: MinHeight,
    pub content_align: ContentAlign,
    pub overlay_opacity: OverlayOpacity,
    pub overlay_color: OverlayColor,
}

impl BlockAttributes {
    pub fn has_image(&self) -> bool {
        self.background_image_id != 0
    }
}
