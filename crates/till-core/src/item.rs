//! # Basket Items
//!
//! A basket line: a reference to a priced catalog entity plus a quantity,
//! with the price frozen at the moment the item was resolved.
//!
//! ## Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two items are THE SAME iff (model_id, model_type) match.               │
//! │                                                                         │
//! │  Quantity and price overrides are ignored by identity:                 │
//! │    Item { model_id: "a", qty: 1, gross: $10 }                          │
//! │    Item { model_id: "a", qty: 7, gross: $12 }   ← same item            │
//! │                                                                         │
//! │  Identity drives lookup, merge-on-add and removal matching in the      │
//! │  collection. Object identity is never used.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry, ModelType, PriceModel};
use crate::error::{BasketError, BasketResult};
use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A line entry in a basket.
///
/// Holds a frozen `PriceModel` snapshot taken from the catalog at
/// resolution time, so later catalog price changes never reach lines
/// already in a basket or lines already committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog entity id this line references.
    pub model_id: String,

    /// Catalog domain of the referenced entity.
    pub model_type: ModelType,

    /// Category at time of resolution (receipt grouping).
    pub category_id: String,

    /// Display name at time of resolution (frozen).
    pub name: String,

    /// Quantity in the basket. At least 1 while the item is stored.
    pub qty: i64,

    /// Price at time of resolution (frozen).
    pub price: PriceModel,
}

impl Item {
    /// Creates an item from a catalog entry with quantity 1, freezing the
    /// entry's current name, category and price.
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Item {
            model_id: entry.model_id.clone(),
            model_type: entry.model_type,
            category_id: entry.category_id.clone(),
            name: entry.name.clone(),
            qty: 1,
            price: entry.price,
        }
    }

    /// Identity relation: same catalog entity, regardless of quantity or
    /// price overrides.
    #[inline]
    pub fn is_same_as(&self, other: &Item) -> bool {
        self.model_id == other.model_id && self.model_type == other.model_type
    }

    /// Line total: `qty * gross`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.gross.multiply_quantity(self.qty)
    }

    /// Tax carried by this line: `qty * vat`.
    #[inline]
    pub fn line_vat(&self) -> Money {
        self.price.vat.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Item Reference
// =============================================================================

/// A loosely-typed item reference accepted by the add protocol.
///
/// Either an already-resolved [`Item`] (used as-is) or a catalog identity
/// that still needs a lookup.
#[derive(Debug, Clone)]
pub enum ItemRef {
    /// Already resolved; resolution passes it through untouched.
    Resolved(Item),
    /// Identity to look up against the catalog.
    Model {
        model_id: String,
        model_type: ModelType,
    },
}

impl ItemRef {
    /// Reference by catalog identity.
    pub fn model(model_id: impl Into<String>, model_type: ModelType) -> Self {
        ItemRef::Model {
            model_id: model_id.into(),
            model_type,
        }
    }

    /// Resolves the reference to a canonical item and applies overrides.
    ///
    /// An unresolved identity with no catalog match is a hard failure
    /// (`BasketError::ModelNotFound`), not a business rejection.
    pub fn resolve(
        self,
        catalog: &dyn Catalog,
        overrides: &ItemOverrides,
    ) -> BasketResult<Item> {
        let mut item = match self {
            ItemRef::Resolved(item) => item,
            ItemRef::Model {
                model_id,
                model_type,
            } => catalog
                .find(&model_id, model_type)
                .map(|entry| Item::from_entry(&entry))
                .ok_or(BasketError::ModelNotFound {
                    model_id,
                    model_type,
                })?,
        };

        overrides.apply_to(&mut item);

        Ok(item)
    }
}

impl From<Item> for ItemRef {
    fn from(item: Item) -> Self {
        ItemRef::Resolved(item)
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// Typed overlay applied to an item after resolution.
///
/// Lets callers pass dynamic price/tax fields that are not part of the
/// canonical catalog record (price-override keys, manual VAT adjustments)
/// without reaching into the item afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemOverrides {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement category.
    pub category_id: Option<String>,
    /// Replacement net price.
    pub net: Option<Money>,
    /// Replacement gross price.
    pub gross: Option<Money>,
    /// Replacement VAT amount.
    pub vat: Option<Money>,
}

impl ItemOverrides {
    /// No overrides.
    pub fn none() -> Self {
        ItemOverrides::default()
    }

    /// Sets a replacement gross price.
    pub fn gross(mut self, gross: Money) -> Self {
        self.gross = Some(gross);
        self
    }

    /// Sets a replacement net price.
    pub fn net(mut self, net: Money) -> Self {
        self.net = Some(net);
        self
    }

    /// Sets a replacement VAT amount.
    pub fn vat(mut self, vat: Money) -> Self {
        self.vat = Some(vat);
        self
    }

    /// Sets a replacement display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Applies every set field to the item.
    pub fn apply_to(&self, item: &mut Item) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category_id) = &self.category_id {
            item.category_id = category_id.clone();
        }
        if let Some(net) = self.net {
            item.price.net = net;
        }
        if let Some(gross) = self.gross {
            item.price.gross = gross;
        }
        if let Some(vat) = self.vat {
            item.price.vat = vat;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
