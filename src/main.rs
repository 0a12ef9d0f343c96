use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use webvitals_blocks::attributes::BlockAttributes;
use webvitals_blocks::catalog::JsonCatalog;
use webvitals_blocks::registry::{self, BlockRegistry, RenderContext};
use webvitals_blocks::{config, library, output, render, resolver};

#[derive(Parser)]
#[command(name = "webvitals-blocks")]
#[command(about = "Hero background block with responsive background images")]
#[command(long_about = "\
Hero background block with responsive background images

A media library is a directory of uploads. Resized copies follow the
name-WxH.ext convention and are matched to the configured size presets:

  uploads/
  ├── 2024/
  │   ├── hero.jpg                 # Original (attachment 1)
  │   ├── hero-150x150.jpg         # thumbnail
  │   ├── hero-300x200.jpg         # medium
  │   └── hero-1024x683.jpg        # large
  └── banner.png                   # Original (attachment 2)

Typical flow:
  webvitals-blocks scan uploads --base-url /wp-content/uploads
  webvitals-blocks save --attributes block.json > saved.html
  webvitals-blocks render --content saved.html

Run 'webvitals-blocks gen-config' to generate a documented config.toml.")]
#[command(version = env!("WEBVITALS_BUILD_VERSION"))]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Media catalog file
    #[arg(long, default_value = "catalog.json", global = true)]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a media library directory into the catalog
    Scan {
        /// Uploads directory
        dir: PathBuf,
        /// Public URL the uploads directory is served under
        #[arg(long, default_value = "/wp-content/uploads")]
        base_url: String,
    },
    /// Print the srcset, sizes and src computed for one image
    Resolve {
        /// Attachment id
        id: u64,
        /// Size label to offer, repeatable (default: config srcset.sizes)
        #[arg(long = "size")]
        sizes: Vec<String>,
    },
    /// Print the saved markup for a block
    Save {
        /// Block attributes as JSON
        #[arg(long)]
        attributes: PathBuf,
        /// Nested content HTML
        #[arg(long)]
        inner: Option<PathBuf>,
    },
    /// Render saved markup, injecting the responsive background script
    Render {
        /// Saved block markup
        #[arg(long)]
        content: PathBuf,
        /// Block attributes as JSON (default: recovered from the markup)
        #[arg(long)]
        attributes: Option<PathBuf>,
    },
    /// Print block.json metadata for every registered block
    BlockJson,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan { dir, base_url } => {
            let plugin_config = config::load_config(&cli.config_dir)?;
            let catalog = library::scan(&dir, &base_url, &plugin_config)?;
            catalog.save(&cli.catalog)?;
            output::print_scan_output(&catalog);
        }
        Command::Resolve { id, sizes } => {
            let plugin_config = config::load_config(&cli.config_dir)?;
            let catalog = JsonCatalog::load(&cli.catalog)?;
            let labels = if sizes.is_empty() {
                plugin_config.srcset.sizes
            } else {
                sizes
            };
            let background = resolver::resolve(&catalog, id, &labels);
            output::print_resolve_output(id, &background);
        }
        Command::Save { attributes, inner } => {
            let attributes = read_attributes(&attributes)?;
            let inner_html = match inner {
                Some(path) => std::fs::read_to_string(path)?,
                None => String::new(),
            };
            println!("{}", render::save(&attributes, &inner_html).into_string());
        }
        Command::Render {
            content,
            attributes,
        } => {
            let plugin_config = config::load_config(&cli.config_dir)?;
            let catalog = JsonCatalog::load(&cli.catalog)?;
            let content = std::fs::read_to_string(&content)?;
            let attributes = match attributes {
                Some(path) => read_attributes(&path)?,
                None => recovered_attributes(&content),
            };

            let mut blocks = BlockRegistry::new();
            registry::register_blocks(&mut blocks, &plugin_config)?;
            let ctx = RenderContext {
                catalog: &catalog,
                size_labels: &plugin_config.srcset.sizes,
            };
            let html = blocks.render(registry::HERO_BACKGROUND, &ctx, &attributes, &content)?;
            println!("{}", html);
        }
        Command::BlockJson => {
            let plugin_config = config::load_config(&cli.config_dir)?;
            let mut blocks = BlockRegistry::new();
            registry::register_blocks(&mut blocks, &plugin_config)?;
            let metadata: Vec<_> = blocks
                .names()
                .filter_map(|name| blocks.get(name))
                .map(|definition| definition.metadata_json())
                .collect();
            let json = match metadata.as_slice() {
                [single] => serde_json::to_string_pretty(single)?,
                _ => serde_json::to_string_pretty(&metadata)?,
            };
            println!("{}", json);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn read_attributes(path: &Path) -> Result<BlockAttributes, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Attributes carrying only the image reference stored in saved markup.
fn recovered_attributes(content: &str) -> BlockAttributes {
    match render::recover_image(content) {
        Some(image) => BlockAttributes {
            background_image_id: image.id,
            background_image_url: image.url,
            ..BlockAttributes::default()
        },
        None => {
            log::warn!("no hero background image reference found in saved markup");
            BlockAttributes::default()
        }
    }
}
