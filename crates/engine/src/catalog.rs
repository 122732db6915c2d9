//! Asset catalog: item lookup by identity.

use match_drop_types::{Item, ItemId};

/// Source of item assets (color, cue, type tag) for the games.
pub trait AssetCatalog {
    /// Look up an item by identity.
    fn item(&self, id: &ItemId) -> Option<&Item>;

    /// Every item, in catalog order.
    fn items(&self) -> &[Item];
}

/// In-memory catalog built from configuration.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl AssetCatalog for Catalog {
    fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == id)
    }

    fn items(&self) -> &[Item] {
        &self.items
    }
}
