//! # Catalog Types
//!
//! The priced catalog the basket resolves items against.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalog Types                                   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogEntry   │   │   PriceModel    │   │    ModelType    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  model_id       │   │  net            │   │  Product        │       │
//! │  │  model_type     │   │  gross          │   │  Service        │       │
//! │  │  category_id    │   │  vat            │   └─────────────────┘       │
//! │  │  name, price    │   └─────────────────┘                             │
//! │  │  stock fields   │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalog itself lives behind the [`Catalog`] trait: the engine only
//! consumes lookups, it never owns catalog storage. till-store provides the
//! in-memory implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, TaxRate};

// =============================================================================
// Model Type
// =============================================================================

/// Discriminator for the catalog domain an entity belongs to.
///
/// Item identity is the pair (`model_id`, `model_type`): the same id in two
/// domains names two different entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// A physical stocked product.
    Product,
    /// A service line (no stock tracking).
    Service,
}

impl ModelType {
    /// Stable string form, used as a grouping key on receipts.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModelType::Product => "product",
            ModelType::Service => "service",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Price Model
// =============================================================================

/// The price triplet attached to a catalog entity.
///
/// Items freeze a copy of this at resolution time, so a basket line keeps
/// the price it was added at even if the catalog changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceModel {
    /// Price excluding tax.
    pub net: Money,
    /// Price including tax.
    pub gross: Money,
    /// Tax portion (`gross - net`).
    pub vat: Money,
}

impl PriceModel {
    /// Builds a price from a net amount and a tax rate.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::catalog::PriceModel;
    /// use till_core::money::{Money, TaxRate};
    ///
    /// let price = PriceModel::from_net(Money::from_cents(1000), TaxRate::from_bps(2000));
    /// assert_eq!(price.vat.cents(), 200);
    /// assert_eq!(price.gross.cents(), 1200);
    /// ```
    pub fn from_net(net: Money, rate: TaxRate) -> Self {
        let vat = net.calculate_tax(rate);
        PriceModel {
            net,
            gross: net + vat,
            vat,
        }
    }

    /// Builds a price with explicit components.
    pub const fn new(net: Money, gross: Money, vat: Money) -> Self {
        PriceModel { net, gross, vat }
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// A priced catalog entity, as returned by a [`Catalog`] lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique identifier (UUID v4).
    pub model_id: String,

    /// Catalog domain this entity belongs to.
    pub model_type: ModelType,

    /// Category the entity is filed under (receipt grouping).
    pub category_id: String,

    /// Display name shown to the operator and on the receipt.
    pub name: String,

    /// Current price.
    pub price: PriceModel,

    /// Whether to track stock for this entity.
    pub track_stock: bool,

    /// Current stock level. Meaningless when `track_stock` is false.
    pub stock: i64,
}

impl CatalogEntry {
    /// Checks whether `quantity` units can be sold.
    ///
    /// Entities that do not track stock can always be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        !self.track_stock || self.stock >= quantity
    }
}

// =============================================================================
// Catalog Port
// =============================================================================

/// Lookup port consumed by item resolution.
///
/// `find` returns a snapshot of the entry; mutating the underlying catalog
/// afterwards does not affect snapshots already handed out.
pub trait Catalog: Send + Sync {
    /// Returns the catalog entry with the given identity, if any.
    fn find(&self, model_id: &str, model_type: ModelType) -> Option<CatalogEntry>;
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(track_stock: bool, stock: i64) -> CatalogEntry {
        CatalogEntry {
            model_id: "m1".to_string(),
            model_type: ModelType::Product,
            category_id: "c1".to_string(),
            name: "Test".to_string(),
            price: PriceModel::from_net(Money::from_cents(1000), TaxRate::from_bps(2000)),
            track_stock,
            stock,
        }
    }

    #[test]
    fn test_price_from_net() {
        let price = PriceModel::from_net(Money::from_cents(999), TaxRate::from_bps(2000));
        assert_eq!(price.net.cents(), 999);
        assert_eq!(price.vat.cents(), 200); // 199.8 rounds up
        assert_eq!(price.gross.cents(), 1199);
    }

    #[test]
    fn test_can_sell() {
        assert!(entry(false, 0).can_sell(100));
        assert!(entry(true, 5).can_sell(5));
        assert!(!entry(true, 5).can_sell(6));
    }

    #[test]
    fn test_model_type_display() {
        assert_eq!(ModelType::Product.to_string(), "product");
        assert_eq!(ModelType::Service.as_str(), "service");
    }
}
