//! End-to-end flow: scan a media library, save a block, render it.
//!
//! Builds a small uploads directory with one original and its resized copies,
//! scans it into a catalog, persists and reloads the catalog, then renders
//! saved markup through the registry exactly as the CLI does.

use std::path::Path;
use tempfile::TempDir;
use webvitals_blocks::attributes::{BlockAttributes, MinHeight, OverlayOpacity};
use webvitals_blocks::catalog::{JsonCatalog, MediaCatalog};
use webvitals_blocks::config::PluginConfig;
use webvitals_blocks::editor::{MediaSelection, apply_patch, remove_image, select_image, set_min_height};
use webvitals_blocks::registry::{BlockRegistry, HERO_BACKGROUND, RenderContext, register_blocks};
use webvitals_blocks::render::{recover_image, save};
use webvitals_blocks::resolver::{resolve, resolve_parallel};

fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

/// uploads/2024/hero.png (1200x800) with medium, medium_large and large
/// copies, plus an unrelated `notes.txt`.
fn uploads() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("2024");
    write_png(&dir.join("hero.png"), 1200, 800);
    write_png(&dir.join("hero-300x200.png"), 300, 200);
    write_png(&dir.join("hero-768x512.png"), 768, 512);
    write_png(&dir.join("hero-1024x683.png"), 1024, 683);
    std::fs::write(tmp.path().join("notes.txt"), "not an image").unwrap();
    tmp
}

fn scanned_catalog(tmp: &TempDir) -> JsonCatalog {
    let library = tmp.path();
    let config = PluginConfig::default();
    let catalog = webvitals_blocks::library::scan(library, "/uploads/", &config).unwrap();

    // Persist and reload, as `scan` then `render` would
    let out = TempDir::new().unwrap();
    let path = out.path().join("catalog.json");
    catalog.save(&path).unwrap();
    let reloaded = JsonCatalog::load(&path).unwrap();
    assert_eq!(reloaded, catalog);
    reloaded
}

fn hero_attributes() -> BlockAttributes {
    let selected = apply_patch(
        &BlockAttributes::default(),
        &select_image(&MediaSelection {
            id: 1,
            url: "/uploads/2024/hero.png".to_string(),
            alt: "Mountains at dawn".to_string(),
        }),
    );
    apply_patch(&selected, &set_min_height(MinHeight::FullViewport))
}

#[test]
fn scan_labels_variants_from_default_presets() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);

    assert_eq!(catalog.len(), 1);
    let hero = catalog.get(1).unwrap();
    assert_eq!(hero.url, "/uploads/2024/hero.png");
    assert_eq!(hero.metadata.width, Some(1200));
    assert_eq!(
        hero.metadata.sizes.keys().collect::<Vec<_>>(),
        vec!["large", "medium", "medium_large"]
    );
    assert_eq!(
        catalog.image_url(1, "large").as_deref(),
        Some("/uploads/2024/hero-1024x683.png")
    );
    assert_eq!(catalog.image_url(1, "thumbnail"), None);
}

#[test]
fn resolve_against_scanned_catalog() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);
    let labels = PluginConfig::default().srcset.sizes;

    let bg = resolve(&catalog, 1, &labels);
    assert_eq!(
        bg.srcset,
        "/uploads/2024/hero-300x200.png 300w, \
         /uploads/2024/hero-1024x683.png 1024w, \
         /uploads/2024/hero.png 1200w"
    );
    assert_eq!(bg.sizes, "100vw");
    assert_eq!(bg.src, "/uploads/2024/hero.png");
    assert_eq!(resolve_parallel(&catalog, 1, &labels), bg);
}

#[test]
fn save_then_render_injects_script() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);
    let config = PluginConfig::default();
    let mut registry = BlockRegistry::new();
    register_blocks(&mut registry, &config).unwrap();
    let ctx = RenderContext {
        catalog: &catalog,
        size_labels: &config.srcset.sizes,
    };

    let attrs = hero_attributes();
    let saved = save(&attrs, "<h2>Welcome</h2>").into_string();
    assert!(saved.contains("min-height:100vh"));
    assert!(saved.contains("<h2>Welcome</h2>"));
    assert!(saved.contains("aria-label=\"Mountains at dawn\""));

    let html = registry.render(HERO_BACKGROUND, &ctx, &attrs, &saved).unwrap();
    assert!(html.starts_with(&saved));
    let script = &html[saved.len()..];
    assert!(script.starts_with("<script>"));
    assert!(script.ends_with("</script>"));
    assert!(script.contains(
        "(1, \"/uploads/2024/hero-300x200.png 300w, \
         /uploads/2024/hero-1024x683.png 1024w, \
         /uploads/2024/hero.png 1200w\", \"100vw\", \"/uploads/2024/hero.png\");"
    ));
}

#[test]
fn render_from_recovered_markup() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);
    let config = PluginConfig::default();
    let mut registry = BlockRegistry::new();
    register_blocks(&mut registry, &config).unwrap();
    let ctx = RenderContext {
        catalog: &catalog,
        size_labels: &config.srcset.sizes,
    };

    let saved = format!(
        "<!-- wp:webvitals-blocks/hero-background -->{}<!-- /wp:webvitals-blocks/hero-background -->",
        save(&hero_attributes(), "").into_string()
    );
    let image = recover_image(&saved).unwrap();
    assert_eq!(image.id, 1);
    assert_eq!(image.url, "/uploads/2024/hero.png");

    let attrs = BlockAttributes {
        background_image_id: image.id,
        background_image_url: image.url,
        ..BlockAttributes::default()
    };
    let html = registry.render(HERO_BACKGROUND, &ctx, &attrs, &saved).unwrap();
    assert!(html.contains("<script>"));
}

#[test]
fn removed_image_renders_unchanged() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);
    let config = PluginConfig::default();
    let mut registry = BlockRegistry::new();
    register_blocks(&mut registry, &config).unwrap();
    let ctx = RenderContext {
        catalog: &catalog,
        size_labels: &config.srcset.sizes,
    };

    let attrs = apply_patch(&hero_attributes(), &remove_image());
    assert_eq!(attrs.background_image_id, 0);
    let saved = save(&attrs, "<p>Text only</p>").into_string();
    assert!(!saved.contains("hero-background-image\""));
    assert!(saved.contains("opacity:0.5"));

    let html = registry.render(HERO_BACKGROUND, &ctx, &attrs, &saved).unwrap();
    assert_eq!(html, saved);
}

#[test]
fn unknown_image_renders_unchanged() {
    let tmp = uploads();
    let catalog = scanned_catalog(&tmp);
    let config = PluginConfig::default();
    let mut registry = BlockRegistry::new();
    register_blocks(&mut registry, &config).unwrap();
    let ctx = RenderContext {
        catalog: &catalog,
        size_labels: &config.srcset.sizes,
    };

    let attrs = BlockAttributes {
        background_image_id: 99,
        background_image_url: "/uploads/gone.png".to_string(),
        overlay_opacity: OverlayOpacity::new(0.0),
        ..BlockAttributes::default()
    };
    let saved = save(&attrs, "").into_string();
    assert!(!saved.contains("hero-background-overlay"));
    let html = registry.render(HERO_BACKGROUND, &ctx, &attrs, &saved).unwrap();
    assert_eq!(html, saved);
}
