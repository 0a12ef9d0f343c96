//! Block registration.
//!
//! Blocks are registered explicitly: the binary (or any embedding host) builds
//! a [`BlockRegistry`], calls [`register_blocks`] once at startup, and then
//! dispatches renders by block name.
//!
//! ```text
//! let mut registry = BlockRegistry::new();
//! register_blocks(&mut registry, &config)?;
//! let html = registry.render(HERO_BACKGROUND, &ctx, &attributes, &saved_markup)?;
//! ```
//!
//! Each [`BlockDefinition`] can also describe itself as a `block.json`
//! document via [`BlockDefinition::metadata_json`].

use crate::attributes::{BlockAttributes, ContentAlign, MinHeight, OverlayOpacity};
use crate::catalog::MediaCatalog;
use crate::config::PluginConfig;
use crate::render::render_hero;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use thiserror::Error;

/// Name of the hero background block.
pub const HERO_BACKGROUND: &str = "webvitals-blocks/hero-background";

const TEXT_DOMAIN: &str = "webvitals-blocks";

#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("Block type \"{0}\" is already registered")]
    AlreadyRegistered(String),
    #[error("Block type \"{0}\" is not registered")]
    NotRegistered(String),
    #[error("Invalid block name \"{0}\" (expected namespace/name)")]
    InvalidName(String),
}

/// Everything a render function may read besides the block itself.
pub struct RenderContext<'a> {
    pub catalog: &'a dyn MediaCatalog,
    /// Size labels for the background srcset, in candidate order.
    pub size_labels: &'a [String],
}

/// Render function: `(context, attributes, saved markup) -> final markup`.
pub type RenderFn = fn(&RenderContext<'_>, &BlockAttributes, &str) -> String;

/// A registered block type.
#[derive(Clone)]
pub struct BlockDefinition {
    pub name: String,
    pub title: String,
    pub category: String,
    pub description: String,
    /// Attribute values for a newly inserted instance.
    pub defaults: BlockAttributes,
    pub render: RenderFn,
}

impl std::fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl BlockDefinition {
    /// `block.json` style metadata: identity plus attribute schema.
    pub fn metadata_json(&self) -> Value {
        let d = &self.defaults;
        json!({
            "$schema": "https://schemas.wp.org/trunk/block.json",
            "apiVersion": 3,
            "name": self.name,
            "version": env!("CARGO_PKG_VERSION"),
            "title": self.title,
            "category": self.category,
            "description": self.description,
            "textdomain": TEXT_DOMAIN,
            "supports": {
                "align": ["wide", "full"],
                "html": false
            },
            "attributes": {
                "backgroundImageId": { "type": "number", "default": d.background_image_id },
                "backgroundImageUrl": { "type": "string", "default": d.background_image_url },
                "backgroundImageAlt": { "type": "string", "default": d.background_image_alt },
                "minHeight": {
                    "type": "string",
                    "enum": MinHeight::ALL.iter().map(MinHeight::as_css).collect::<Vec<_>>(),
                    "default": d.min_height.as_css()
                },
                "contentAlign": {
                    "type": "string",
                    "enum": ContentAlign::ALL.iter().map(ContentAlign::as_css).collect::<Vec<_>>(),
                    "default": d.content_align.as_css()
                },
                "overlayOpacity": {
                    "type": "number",
                    "minimum": 0,
                    "maximum": 1,
                    "multipleOf": OverlayOpacity::STEP,
                    "default": d.overlay_opacity.value()
                },
                "overlayColor": { "type": "string", "default": d.overlay_color.as_str() }
            }
        })
    }
}

/// Registered block types, keyed by name.
#[derive(Debug, Default)]
pub struct BlockRegistry {
    blocks: BTreeMap<String, BlockDefinition>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: BlockDefinition) -> Result<(), RegistryError> {
        if !is_valid_name(&definition.name) {
            return Err(RegistryError::InvalidName(definition.name));
        }
        if self.blocks.contains_key(&definition.name) {
            return Err(RegistryError::AlreadyRegistered(definition.name));
        }
        log::debug!("registered block type {}", definition.name);
        self.blocks.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BlockDefinition> {
        self.blocks.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    /// Render one block instance through its registered render function.
    pub fn render(
        &self,
        name: &str,
        ctx: &RenderContext<'_>,
        attributes: &BlockAttributes,
        content: &str,
    ) -> Result<String, RegistryError> {
        let definition = self
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))?;
        Ok((definition.render)(ctx, attributes, content))
    }
}

fn is_valid_name(name: &str) -> bool {
    let valid_part = |s: &str| {
        !s.is_empty()
            && s.starts_with(|c: char| c.is_ascii_lowercase())
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };
    matches!(name.split_once('/'), Some((ns, block)) if valid_part(ns) && valid_part(block))
}

fn render_hero_background(ctx: &RenderContext<'_>, attributes: &BlockAttributes, content: &str) -> String {
    render_hero(content, attributes, ctx.catalog, ctx.size_labels)
}

/// Definition of the hero background block with the configured defaults.
pub fn hero_background_definition(config: &PluginConfig) -> BlockDefinition {
    BlockDefinition {
        name: HERO_BACKGROUND.to_string(),
        title: "Hero Background".to_string(),
        category: "design".to_string(),
        description: "Full-width hero section with a responsive background image, overlay and nested content."
            .to_string(),
        defaults: config.defaults.to_attributes(),
        render: render_hero_background,
    }
}

/// Register every block this crate provides.
pub fn register_blocks(registry: &mut BlockRegistry, config: &PluginConfig) -> Result<(), RegistryError> {
    registry.register(hero_background_definition(config))
}
