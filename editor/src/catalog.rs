//! Sprite catalog: the seam between the scene and the loaded sprite sheet.
//!
//! Image decoding and sheet slicing live in the host. The scene only needs to
//! ask "what is sprite `index` of `category`?" and get back a name, pixel
//! dimensions and an opaque [`ImageHandle`] the renderer understands. Handles
//! are never persisted; `(category, index)` is the durable reference and is
//! re-resolved here on every load.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::doc::Category;

/// Opaque reference to a decoded sprite image owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageHandle(pub u64);

/// A resolved catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Sprite name, used as the element's export id.
    pub name: String,
    /// Pixel width of the sprite.
    pub width: f64,
    /// Pixel height of the sprite.
    pub height: f64,
    /// Handle the renderer draws with.
    pub image: ImageHandle,
}

/// `(category, index)` did not resolve to a sprite.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no {category} sprite at index {index} (catalog has {len})")]
pub struct CatalogLookupError {
    pub category: Category,
    pub index: usize,
    /// Number of sprites the catalog holds for `category`.
    pub len: usize,
}

/// Source of sprites for spawning and reloading elements.
pub trait SpriteCatalog {
    /// Resolve sprite `index` within `category`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLookupError`] when `index` is out of range for `category`.
    fn lookup(&self, category: Category, index: usize) -> Result<Sprite, CatalogLookupError>;
}

impl<C: SpriteCatalog + ?Sized> SpriteCatalog for &C {
    fn lookup(&self, category: Category, index: usize) -> Result<Sprite, CatalogLookupError> {
        (**self).lookup(category, index)
    }
}

/// One sprite as listed in a catalog manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteEntry {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

/// In-memory catalog, keyed by category, with handles assigned in load order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sprites: HashMap<Category, Vec<Sprite>>,
    next_handle: u64,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sprite to `category` and return its index within that category.
    pub fn push(&mut self, category: Category, name: impl Into<String>, width: f64, height: f64) -> usize {
        let image = ImageHandle(self.next_handle);
        self.next_handle += 1;
        let list = self.sprites.entry(category).or_default();
        list.push(Sprite { name: name.into(), width, height, image });
        list.len() - 1
    }

    /// Build a catalog from a manifest mapping category tags to sprite lists,
    /// e.g. `{"wall": [{"name": "wall_top", "width": 16, "height": 16}]}`.
    ///
    /// Categories are loaded in tag order so handle assignment is stable.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the manifest is malformed or names an unknown category.
    pub fn from_manifest_json(json: &str) -> Result<Self, serde_json::Error> {
        let manifest: HashMap<Category, Vec<SpriteEntry>> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for category in Category::ALL {
            let Some(entries) = manifest.get(&category) else {
                continue;
            };
            for entry in entries {
                catalog.push(category, entry.name.clone(), entry.width, entry.height);
            }
        }
        tracing::debug!(sprites = catalog.len(), "catalog loaded from manifest");
        Ok(catalog)
    }

    /// Number of sprites listed for `category`.
    #[must_use]
    pub fn category_len(&self, category: Category) -> usize {
        self.sprites.get(&category).map_or(0, Vec::len)
    }

    /// Total number of sprites across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sprites.values().map(Vec::len).sum()
    }

    /// Returns `true` if the catalog holds no sprites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpriteCatalog for Catalog {
    fn lookup(&self, category: Category, index: usize) -> Result<Sprite, CatalogLookupError> {
        let list = self.sprites.get(&category).map_or(&[][..], Vec::as_slice);
        list.get(index)
            .cloned()
            .ok_or(CatalogLookupError { category, index, len: list.len() })
    }
}
