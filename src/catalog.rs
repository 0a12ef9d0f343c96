//! Media catalog: uploaded images and their precomputed size variants.
//!
//! The resolver only needs two read operations, captured by the
//! [`MediaCatalog`] trait:
//!
//! - [`image_url`](MediaCatalog::image_url): URL of an image at a size label
//! - [`metadata`](MediaCatalog::metadata): intrinsic width plus per-label widths
//!
//! [`JsonCatalog`] is the bundled implementation. It stores attachments in a
//! `catalog.json` file shaped like host attachment metadata:
//!
//! ```json
//! {
//!   "attachments": [
//!     {
//!       "id": 1,
//!       "url": "https://example.com/uploads/2024/hero.jpg",
//!       "metadata": {
//!         "width": 2400,
//!         "height": 1600,
//!         "file": "2024/hero.jpg",
//!         "sizes": {
//!           "medium": { "file": "hero-300x200.jpg", "width": 300, "height": 200 },
//!           "large": { "file": "hero-1024x683.jpg", "width": 1024, "height": 683 }
//!         }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! Variant URLs are the full-size URL with its filename replaced by the
//! variant `file`. The `"full"` label always maps to the attachment URL.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Size label for the original upload.
pub const FULL_SIZE: &str = "full";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate attachment id {0}")]
    DuplicateId(u64),
    #[error("Attachment id 0 is reserved for \"no image\"")]
    ReservedId,
}

/// Read access to uploaded images.
///
/// Lookups are read-only and expected to be local; a miss is `None`, never an
/// error.
pub trait MediaCatalog: Sync {
    /// URL of `image_id` at `size`, or `None` if the image or size is unknown.
    fn image_url(&self, image_id: u64, size: &str) -> Option<String>;

    /// Width metadata for `image_id`, or `None` if the image is unknown.
    fn metadata(&self, image_id: u64) -> Option<AttachmentMetadata>;
}

/// Stored metadata for one attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    /// Intrinsic width of the original, when it could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Path of the original relative to the library root.
    #[serde(default)]
    pub file: String,
    /// Generated variants keyed by size label.
    #[serde(default)]
    pub sizes: BTreeMap<String, SizeVariant>,
}

impl AttachmentMetadata {
    /// Recorded width for `size`, without any fallback.
    pub fn size_width(&self, size: &str) -> Option<u32> {
        self.sizes.get(size).map(|v| v.width)
    }
}

/// A resized copy of an original upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    /// File name, in the same directory as the original.
    pub file: String,
    pub width: u32,
    pub height: u32,
}

/// One uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    /// URL of the original upload.
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alt: String,
    #[serde(default)]
    pub metadata: AttachmentMetadata,
}

impl Attachment {
    /// URL of this attachment at `size`.
    pub fn url_for(&self, size: &str) -> Option<String> {
        if size == FULL_SIZE {
            return Some(self.url.clone());
        }
        let variant = self.metadata.sizes.get(size)?;
        let dir = match self.url.rfind('/') {
            Some(pos) => &self.url[..=pos],
            None => "",
        };
        Some(format!("{dir}{}", variant.file))
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    attachments: Vec<Attachment>,
}

/// Catalog backed by an in-memory map, persisted as `catalog.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonCatalog {
    attachments: BTreeMap<u64, Attachment>,
}

impl JsonCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list, rejecting duplicate and zero ids.
    pub fn from_attachments(attachments: Vec<Attachment>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for attachment in attachments {
            catalog.insert(attachment)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, attachment: Attachment) -> Result<(), CatalogError> {
        if attachment.id == 0 {
            return Err(CatalogError::ReservedId);
        }
        if self.attachments.contains_key(&attachment.id) {
            return Err(CatalogError::DuplicateId(attachment.id));
        }
        self.attachments.insert(attachment.id, attachment);
        Ok(())
    }

    pub fn get(&self, image_id: u64) -> Option<&Attachment> {
        self.attachments.get(&image_id)
    }

    /// Attachments in id order.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.values()
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_attachments(file.attachments)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        let file = CatalogFile {
            attachments: self.attachments.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

impl MediaCatalog for JsonCatalog {
    fn image_url(&self, image_id: u64, size: &str) -> Option<String> {
        self.get(image_id)?.url_for(size)
    }

    fn metadata(&self, image_id: u64) -> Option<AttachmentMetadata> {
        self.get(image_id).map(|a| a.metadata.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hero() -> Attachment {
        let mut sizes = BTreeMap::new();
        sizes.insert(
            "medium".to_string(),
            SizeVariant {
                file: "hero-300x200.jpg".to_string(),
                width: 300,
                height: 200,
            },
        );
        Attachment {
            id: 5,
            url: "https://example.com/uploads/2024/hero.jpg".to_string(),
            title: "hero".to_string(),
            alt: String::new(),
            metadata: AttachmentMetadata {
                width: Some(2400),
                height: Some(1600),
                file: "2024/hero.jpg".to_string(),
                sizes,
            },
        }
    }

    #[test]
    fn full_size_is_attachment_url() {
        let catalog = JsonCatalog::from_attachments(vec![hero()]).unwrap();
        assert_eq!(
            catalog.image_url(5, FULL_SIZE).as_deref(),
            Some("https://example.com/uploads/2024/hero.jpg")
        );
    }

    #[test]
    fn variant_url_replaces_file_name() {
        let catalog = JsonCatalog::from_attachments(vec![hero()]).unwrap();
        assert_eq!(
            catalog.image_url(5, "medium").as_deref(),
            Some("https://example.com/uploads/2024/hero-300x200.jpg")
        );
    }

    #[test]
    fn missing_size_or_image_is_none() {
        let catalog = JsonCatalog::from_attachments(vec![hero()]).unwrap();
        assert_eq!(catalog.image_url(5, "large"), None);
        assert_eq!(catalog.image_url(6, FULL_SIZE), None);
        assert_eq!(catalog.metadata(6), None);
    }

    #[test]
    fn metadata_exposes_widths() {
        let catalog = JsonCatalog::from_attachments(vec![hero()]).unwrap();
        let meta = catalog.metadata(5).unwrap();
        assert_eq!(meta.width, Some(2400));
        assert_eq!(meta.size_width("medium"), Some(300));
        assert_eq!(meta.size_width("large"), None);
    }

    #[test]
    fn duplicate_id_rejected() {
        let result = JsonCatalog::from_attachments(vec![hero(), hero()]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(5))));
    }

    #[test]
    fn zero_id_rejected() {
        let mut attachment = hero();
        attachment.id = 0;
        let result = JsonCatalog::from_attachments(vec![attachment]);
        assert!(matches!(result, Err(CatalogError::ReservedId)));
    }

    #[test]
    fn parse_minimal_json() {
        let json = r#"{"attachments": [{"id": 9, "url": "/u/a.png"}]}"#;
        let catalog = JsonCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let meta = catalog.metadata(9).unwrap();
        assert_eq!(meta.width, None);
        assert!(meta.sizes.is_empty());
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/catalog.json");
        let catalog = JsonCatalog::from_attachments(vec![hero()]).unwrap();
        catalog.save(&path).unwrap();

        let loaded = JsonCatalog::load(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn load_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonCatalog::load(&path), Err(CatalogError::Json(_))));
    }
}
