//! # Item Collection
//!
//! Ordered, mutable container of the items belonging to one basket; the
//! transactional mutation core of the engine.
//!
//! ## Invariants
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Uniqueness: no two entries satisfy is_same_as. Adding an item      │
//! │     that matches an existing entry merges quantities, always.          │
//! │                                                                         │
//! │  2. Quantity: every stored entry has qty >= 1. An entry whose          │
//! │     quantity would drop to 0 or below is removed entirely.             │
//! │                                                                         │
//! │  3. Order: insertion order is preserved; removal deletes in place      │
//! │     and the remaining entries keep their relative order.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The collection is a pure container: constraint gating, event emission
//! and atomicity live one level up, in the basket's update wrapper. Every
//! mutating method here assumes the gate has already passed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::money::Money;
use crate::transaction::{TransactionHeader, TransactionLine};

// =============================================================================
// Removal Policy
// =============================================================================

/// How much of a matching entry `remove` takes.
///
/// Replaces the `-1` quantity sentinel: the two meanings ("remove the
/// whole entry" vs. "decrement by n") are distinct variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Drop every matching entry entirely, regardless of quantity.
    All,
    /// Decrement matching entries by this many units. An entry whose
    /// remaining quantity would reach 0 (or that holds a single unit) is
    /// dropped instead of stored at zero.
    Count(i64),
}

// =============================================================================
// Grouping
// =============================================================================

/// Attribute to partition entries by for receipt/category display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Group by catalog domain (`product`, `service`).
    ModelType,
    /// Group by category id.
    CategoryId,
}

impl GroupKey {
    fn key_of(&self, item: &Item) -> String {
        match self {
            GroupKey::ModelType => item.model_type.as_str().to_string(),
            GroupKey::CategoryId => item.category_id.clone(),
        }
    }
}

// =============================================================================
// Item Collection
// =============================================================================

/// Ordered sequence of unique items (unique by `is_same_as`), owned
/// exclusively by one basket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCollection {
    items: Vec<Item>,
}

impl ItemCollection {
    /// Empty collection.
    pub fn new() -> Self {
        ItemCollection { items: Vec::new() }
    }

    /// Builds a collection from existing items, merging duplicates so the
    /// uniqueness invariant holds from the start.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut collection = ItemCollection::new();
        for item in items {
            let qty = item.qty.max(1);
            let mut unit = item;
            unit.qty = 1;
            collection.merge(unit, qty);
        }
        collection
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of line entries (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count of all items, factoring in each entry's quantity.
    ///
    /// ## Example
    /// ```text
    /// [ Cola qty=2, Crisps qty=3 ]  →  count() == 5, len() == 2
    /// ```
    pub fn count(&self) -> i64 {
        self.items.iter().map(|item| item.qty).sum()
    }

    /// Balance of all items: sum of `qty * gross`.
    pub fn balance(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.line_total())
    }

    /// Net total: sum of `qty * net`.
    pub fn net_total(&self) -> Money {
        self.items.iter().fold(Money::zero(), |acc, item| {
            acc + item.price.net.multiply_quantity(item.qty)
        })
    }

    /// VAT total: sum of `qty * vat`.
    pub fn vat_total(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, item| acc + item.line_vat())
    }

    /// Checks if the collection has an entry matching the given item.
    pub fn has(&self, item: &Item) -> bool {
        self.items.iter().any(|i| i.is_same_as(item))
    }

    /// Checks if the collection has an entry matching any of the given
    /// items.
    pub fn has_one_of<'a>(&self, items: impl IntoIterator<Item = &'a Item>) -> bool {
        items.into_iter().any(|item| self.has(item))
    }

    /// Quantity held for the entry matching the given item (0 when
    /// absent).
    pub fn qty_of(&self, item: &Item) -> i64 {
        self.items
            .iter()
            .find(|i| i.is_same_as(item))
            .map(|i| i.qty)
            .unwrap_or(0)
    }

    /// The stored entry matching the given item, if any.
    pub fn find(&self, item: &Item) -> Option<&Item> {
        self.items.iter().find(|i| i.is_same_as(item))
    }

    // -------------------------------------------------------------------------
    // Mutation (gate already passed)
    // -------------------------------------------------------------------------

    /// Merges `count` units of the item into the collection.
    ///
    /// ## Behavior
    /// - Matching entry exists: its quantity grows by `count`; the
    ///   incoming item's own fields are discarded.
    /// - No match: the item is inserted once and the remaining
    ///   `count - 1` units are added onto it.
    ///
    /// Never creates a second entry for the same identity. `count` must be
    /// at least 1; the basket validates before calling.
    pub fn merge(&mut self, item: Item, count: i64) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.is_same_as(&item)) {
            existing.qty += count;
            return;
        }

        let mut item = item;
        item.qty += count - 1;
        self.items.push(item);
    }

    /// Removes matching entries according to the removal policy.
    ///
    /// Non-matching entries are untouched and keep their relative order.
    pub fn remove(&mut self, item: &Item, removal: Removal) {
        self.items.retain_mut(|i| {
            if !i.is_same_as(item) {
                return true;
            }

            match removal {
                Removal::All => false,
                Removal::Count(qty) => {
                    // Dropping at <= 1 (or when the decrement would hit 0)
                    // keeps the stored-quantity invariant: no entry ever
                    // holds qty <= 0.
                    if i.qty <= 1 || i.qty - qty <= 0 {
                        false
                    } else {
                        i.qty -= qty;
                        true
                    }
                }
            }
        });
    }

    /// Applies the mutator to every entry matching the given item
    /// (normally exactly one, given the uniqueness invariant).
    ///
    /// Entries left with `qty <= 0` by the mutator are purged.
    pub fn apply<F>(&mut self, item: &Item, mutator: F)
    where
        F: Fn(&mut Item),
    {
        for i in self.items.iter_mut().filter(|i| i.is_same_as(item)) {
            mutator(i);
        }

        self.items.retain(|i| i.qty >= 1);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    // -------------------------------------------------------------------------
    // Display & Commit
    // -------------------------------------------------------------------------

    /// Entries partitioned by the given attribute, within-group order
    /// preserved. Receipt/category display path.
    pub fn grouped(&self, key: GroupKey) -> BTreeMap<String, Vec<Item>> {
        let mut groups: BTreeMap<String, Vec<Item>> = BTreeMap::new();

        for item in &self.items {
            groups.entry(key.key_of(item)).or_default().push(item.clone());
        }

        groups
    }

    /// Serializes every entry into a transaction line under the given
    /// header.
    ///
    /// Values are copied from the item's frozen price at this moment;
    /// the lines never reference back to the catalog or the basket.
    pub fn commit(&self, header: &TransactionHeader) -> Vec<TransactionLine> {
        self.items
            .iter()
            .map(|item| TransactionLine {
                header_id: header.id.clone(),
                model_id: item.model_id.clone(),
                model_type: item.model_type,
                qty: item.qty,
                net: item.price.net,
                gross: item.price.gross,
                vat: item.price.vat,
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
