//! Plugin configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [srcset]
//! sizes = ["medium", "large", "full"]   # Size labels offered as candidates, in order
//!
//! [image_sizes.thumbnail]
//! width = 150
//! height = 150
//! crop = true
//!
//! [image_sizes.medium]
//! width = 300
//! height = 300
//!
//! [image_sizes.medium_large]
//! width = 768
//! height = 0                # 0 = unbounded
//!
//! [image_sizes.large]
//! width = 1024
//! height = 1024
//!
//! [defaults]
//! min_height = "500px"      # 300px | 400px | 500px | 600px | 100vh
//! content_align = "center"  # flex-start | center | flex-end
//! overlay_opacity = 0.5     # 0.0 - 1.0, step 0.1
//! overlay_color = "#000000"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::attributes::{BlockAttributes, ContentAlign, MinHeight, OverlayColor, OverlayOpacity};
use crate::catalog::FULL_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Plugin configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Which size labels feed the background `srcset`.
    pub srcset: SrcsetConfig,
    /// Size presets used to label variants when scanning a media library.
    pub image_sizes: BTreeMap<String, SizePreset>,
    /// Attributes of a freshly inserted block.
    pub defaults: DefaultsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            srcset: SrcsetConfig::default(),
            image_sizes: default_image_sizes(),
            defaults: DefaultsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PluginConfig {
    /// Validate config values are consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.srcset.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "srcset.sizes must not be empty".into(),
            ));
        }
        for label in &self.srcset.sizes {
            if label != FULL_SIZE && !self.image_sizes.contains_key(label) {
                return Err(ConfigError::Validation(format!(
                    "srcset.sizes entry '{label}' is not \"full\" or a configured image size"
                )));
            }
        }
        if self.image_sizes.contains_key(FULL_SIZE) {
            return Err(ConfigError::Validation(
                "image_sizes.full is reserved for the original upload".into(),
            ));
        }
        for (label, preset) in &self.image_sizes {
            if preset.width == 0 && preset.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "image_sizes.{label} needs a non-zero width or height"
                )));
            }
            if preset.crop && (preset.width == 0 || preset.height == 0) {
                return Err(ConfigError::Validation(format!(
                    "image_sizes.{label} is cropped and needs both width and height"
                )));
            }
        }
        Ok(())
    }
}

/// Candidate selection for the background `srcset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SrcsetConfig {
    /// Size labels in candidate order.
    pub sizes: Vec<String>,
}

impl Default for SrcsetConfig {
    fn default() -> Self {
        Self {
            sizes: vec!["medium".into(), "large".into(), FULL_SIZE.into()],
        }
    }
}

/// A named image size: the bounding box variants are generated into.
///
/// A zero width or height leaves that edge unbounded. Cropped presets produce
/// exactly `width x height` (when the original is large enough).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizePreset {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub crop: bool,
}

impl SizePreset {
    pub const fn new(width: u32, height: u32, crop: bool) -> Self {
        Self {
            width,
            height,
            crop,
        }
    }
}

fn default_image_sizes() -> BTreeMap<String, SizePreset> {
    BTreeMap::from([
        ("thumbnail".to_string(), SizePreset::new(150, 150, true)),
        ("medium".to_string(), SizePreset::new(300, 300, false)),
        ("medium_large".to_string(), SizePreset::new(768, 0, false)),
        ("large".to_string(), SizePreset::new(1024, 1024, false)),
    ])
}

/// Default attribute values for newly inserted blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub min_height: MinHeight,
    pub content_align: ContentAlign,
    pub overlay_opacity: OverlayOpacity,
    pub overlay_color: OverlayColor,
}

impl DefaultsConfig {
    /// Attributes of a block with no image selected yet.
    pub fn to_attributes(&self) -> BlockAttributes {
        BlockAttributes {
            min_height: self.min_height,
            content_align: self.content_align,
            overlay_opacity: self.overlay_opacity,
            overlay_color: self.overlay_color.clone(),
            ..BlockAttributes::default()
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(PluginConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults do not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PluginConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PluginConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<PluginConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# WebVitals Blocks Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Responsive background srcset
# ---------------------------------------------------------------------------
[srcset]
# Size labels offered to the browser as srcset candidates, in this order.
# Each must be "full" (the original upload) or a key of [image_sizes].
sizes = ["medium", "large", "full"]

# ---------------------------------------------------------------------------
# Image size presets
# ---------------------------------------------------------------------------
# Bounding boxes used to recognise resized variants (name-WxH.ext) when
# scanning a media library. A 0 edge is unbounded; crop = true means the
# variant is cut to exactly width x height.
[image_sizes.thumbnail]
width = 150
height = 150
crop = true

[image_sizes.medium]
width = 300
height = 300

[image_sizes.medium_large]
width = 768
height = 0

[image_sizes.large]
width = 1024
height = 1024

# ---------------------------------------------------------------------------
# Block defaults
# ---------------------------------------------------------------------------
[defaults]
# One of: 300px, 400px, 500px, 600px, 100vh
min_height = "500px"

# One of: flex-start (top), center, flex-end (bottom)
content_align = "center"

# 0.0 - 1.0 in steps of 0.1; 0 hides the overlay.
overlay_opacity = 0.5

# Hex color: #rgb, #rrggbb or #rrggbbaa
overlay_color = "#000000"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for library scans.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
