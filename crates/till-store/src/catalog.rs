//! # Catalog Repository
//!
//! In-memory implementation of the core's catalog lookup port, plus demo
//! seeding.
//!
//! ## Snapshot Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find() clones the entry out of the store.                              │
//! │                                                                         │
//! │  Items freeze that clone's price at resolution time, so a later        │
//! │  set_price() here changes what FUTURE adds resolve to, and never       │
//! │  what already sits in a basket or a committed transaction.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::RwLock;

use tracing::debug;

use till_core::catalog::{Catalog, CatalogEntry, ModelType, PriceModel};
use till_core::deal::Deal;
use till_core::money::{Money, TaxRate};

// =============================================================================
// Memory Catalog
// =============================================================================

/// Catalog repository backed by an in-memory entry list.
///
/// Interior-mutable behind a lock so lookups work through a shared
/// `Arc<dyn Catalog>` handle while an admin surface edits prices and
/// stock.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl MemoryCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        MemoryCatalog {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Catalog pre-filled with the given entries.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        MemoryCatalog {
            entries: RwLock::new(entries),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().expect("catalog lock poisoned").len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts the entry, replacing any existing entry with the same
    /// identity.
    pub fn upsert(&self, entry: CatalogEntry) {
        debug!(model_id = %entry.model_id, model_type = %entry.model_type, "Upserting catalog entry");

        let mut entries = self.entries.write().expect("catalog lock poisoned");
        match entries
            .iter_mut()
            .find(|e| e.model_id == entry.model_id && e.model_type == entry.model_type)
        {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// Rewrites the price of an entry in place.
    pub fn set_price(&self, model_id: &str, model_type: ModelType, price: PriceModel) {
        debug!(model_id = %model_id, gross = %price.gross, "Updating catalog price");

        let mut entries = self.entries.write().expect("catalog lock poisoned");
        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.model_id == model_id && e.model_type == model_type)
        {
            entry.price = price;
        }
    }

    /// Rewrites the stock level of an entry in place.
    pub fn set_stock(&self, model_id: &str, model_type: ModelType, stock: i64) {
        let mut entries = self.entries.write().expect("catalog lock poisoned");
        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.model_id == model_id && e.model_type == model_type)
        {
            entry.track_stock = true;
            entry.stock = stock;
        }
    }
}

impl Catalog for MemoryCatalog {
    fn find(&self, model_id: &str, model_type: ModelType) -> Option<CatalogEntry> {
        let entry = self
            .entries
            .read()
            .expect("catalog lock poisoned")
            .iter()
            .find(|e| e.model_id == model_id && e.model_type == model_type)
            .cloned();

        debug!(model_id = %model_id, found = entry.is_some(), "Catalog lookup");

        entry
    }
}

// =============================================================================
// Demo Seeding
// =============================================================================

/// Standard VAT rate used by the demo seed.
const DEMO_VAT: TaxRate = TaxRate::from_bps(2000);

fn product(model_id: &str, category_id: &str, name: &str, net_cents: i64) -> CatalogEntry {
    CatalogEntry {
        model_id: model_id.to_string(),
        model_type: ModelType::Product,
        category_id: category_id.to_string(),
        name: name.to_string(),
        price: PriceModel::from_net(Money::from_cents(net_cents), DEMO_VAT),
        track_stock: false,
        stock: 0,
    }
}

/// Seeds a catalog with a small categorized product range plus a service
/// line, mirroring what a fresh demo deployment starts with.
pub fn seed_demo_catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();

    for entry in [
        product("cola-330", "drinks", "Cola 330ml", 100),
        product("water-500", "drinks", "Still Water 500ml", 75),
        product("crisps-salted", "snacks", "Salted Crisps", 70),
        product("chocolate-bar", "snacks", "Chocolate Bar", 85),
        product("sandwich-cheese", "food", "Cheese Sandwich", 250),
    ] {
        catalog.upsert(entry);
    }

    // A stocked line so the stock constraint has something to bite on
    let mut limited = product("gift-card", "misc", "Gift Card", 1000);
    limited.track_stock = true;
    limited.stock = 10;
    catalog.upsert(limited);

    catalog.upsert(CatalogEntry {
        model_id: "carrier-bag".to_string(),
        model_type: ModelType::Service,
        category_id: "misc".to_string(),
        name: "Carrier Bag".to_string(),
        price: PriceModel::from_net(Money::from_cents(10), DEMO_VAT),
        track_stock: false,
        stock: 0,
    });

    catalog
}

/// The demo deal descriptor: a buy-one-get-one-free window wide open for
/// a millennium.
pub fn demo_deal() -> Deal {
    use chrono::TimeZone;

    Deal::new(
        "Buy One Get One Free",
        chrono::Utc
            .with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
            .single()
            .expect("valid demo window start"),
        chrono::Utc
            .with_ymd_and_hms(3000, 1, 1, 12, 0, 0)
            .single()
            .expect("valid demo window end"),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_find() {
        let catalog = MemoryCatalog::new();
        catalog.upsert(product("m1", "c1", "Thing", 100));

        let found = catalog.find("m1", ModelType::Product).unwrap();
        assert_eq!(found.name, "Thing");

        // Same identity replaces
        catalog.upsert(product("m1", "c1", "Renamed", 100));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("m1", ModelType::Product).unwrap().name, "Renamed");
    }

    #[test]
    fn test_find_respects_model_type() {
        let catalog = MemoryCatalog::new();
        catalog.upsert(product("m1", "c1", "Thing", 100));

        assert!(catalog.find("m1", ModelType::Service).is_none());
    }

    #[test]
    fn test_set_price_changes_future_lookups() {
        let catalog = MemoryCatalog::new();
        catalog.upsert(product("m1", "c1", "Thing", 100));

        let before = catalog.find("m1", ModelType::Product).unwrap();

        catalog.set_price(
            "m1",
            ModelType::Product,
            PriceModel::from_net(Money::from_cents(200), DEMO_VAT),
        );

        let after = catalog.find("m1", ModelType::Product).unwrap();
        assert_ne!(before.price, after.price);
        // The clone handed out earlier is unaffected
        assert_eq!(before.price.net.cents(), 100);
    }

    #[test]
    fn test_seed_demo_catalog() {
        let catalog = seed_demo_catalog();

        assert!(!catalog.is_empty());
        assert!(catalog.find("cola-330", ModelType::Product).is_some());
        assert!(catalog.find("carrier-bag", ModelType::Service).is_some());

        let gift_card = catalog.find("gift-card", ModelType::Product).unwrap();
        assert!(gift_card.track_stock);
        assert_eq!(gift_card.stock, 10);
    }

    #[test]
    fn test_demo_deal_window() {
        use chrono::TimeZone;

        let deal = demo_deal();
        assert!(deal.active_at(chrono::Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()));
    }
}
