//! # Application State
//!
//! Shared state for the demo service: its configuration and an in-memory
//! item catalog.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::config::AppConfig;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub tags: Vec<String>,
}

/// Listing order for [`Catalog::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Id,
    Name,
    Price,
}

impl Order {
    /// Parse an order name accepted by the listing schema.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct CatalogInner {
    items: Vec<Item>,
    next_id: i64,
}

/// Thread-safe, cloneable item store.
///
/// The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    inner: Arc<RwLock<CatalogInner>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, assigning the next id.
    pub fn insert(&self, name: String, price: i64, tags: Vec<String>) -> Item {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let item = Item {
            id: inner.next_id,
            name,
            price,
            tags,
        };
        inner.items.push(item.clone());
        item
    }

    pub fn get(&self, id: i64) -> Option<Item> {
        self.inner.read().items.iter().find(|i| i.id == id).cloned()
    }

    /// Items carrying `tag` (all items when `None`), sorted by `order`.
    pub fn list(&self, tag: Option<&str>, order: Order) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .inner
            .read()
            .items
            .iter()
            .filter(|item| tag.map_or(true, |t| item.tags.iter().any(|x| x == t)))
            .cloned()
            .collect();
        match order {
            Order::Id => items.sort_by_key(|i| i.id),
            Order::Name => items.sort_by(|a, b| a.name.cmp(&b.name)),
            Order::Price => items.sort_by_key(|i| (i.price, i.id)),
        }
        items
    }

    /// Items whose name contains `needle`, case-insensitively.
    pub fn search(&self, needle: &str) -> Vec<Item> {
        let needle = needle.to_lowercase();
        self.inner
            .read()
            .items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            catalog: Catalog::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Catalog {
        let catalog = Catalog::new();
        catalog.insert("Widget".into(), 30, vec!["tools".into()]);
        catalog.insert("Anvil".into(), 90, vec!["tools".into(), "heavy".into()]);
        catalog.insert("Kite".into(), 10, vec![]);
        catalog
    }

    #[test]
    fn ids_are_assigned_in_order() {
        let catalog = seeded();
        let ids: Vec<_> = catalog.list(None, Order::Id).iter().map(|i| i.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        assert_eq!(catalog.get(2).map(|i| i.name), Some("Anvil".to_string()));
        assert!(catalog.get(9).is_none());
    }

    #[test]
    fn list_filters_and_orders() {
        let catalog = seeded();
        let names: Vec<_> = catalog
            .list(Some("tools"), Order::Name)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Anvil", "Widget"]);

        let prices: Vec<_> = catalog.list(None, Order::Price).iter().map(|i| i.price).collect();
        assert_eq!(prices, [10, 30, 90]);
    }

    #[test]
    fn search_ignores_case() {
        let found = seeded().search("KIT");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Kite");
    }
}
