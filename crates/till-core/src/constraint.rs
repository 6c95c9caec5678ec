//! # Constraint Engine
//!
//! Pluggable validators that approve or reject a proposed basket mutation.
//!
//! ## Evaluation Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Constraint Evaluation                               │
//! │                                                                         │
//! │  mutation ──► ConstraintSet::evaluate(ctx, kind)                        │
//! │                    │                                                    │
//! │                    ├── constraint #1 ── Pass                            │
//! │                    ├── constraint #2 ── Fail("Only 3 Cola in stock")   │
//! │                    │        │                                           │
//! │                    │        └── STOP. Remaining constraints never run. │
//! │                    ▼                                                    │
//! │               Verdict::Fail(reason) ──► basket exception, rollback     │
//! │                                                                         │
//! │  Registration order is evaluation order. First failure wins.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing constraint is an expected, user-facing outcome ("item out of
//! stock"), not a programming error: it never panics and never produces a
//! `BasketError`. The basket turns the verdict into a rejection value.

use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::collection::ItemCollection;
use crate::item::Item;
use crate::{MAX_BASKET_LINES, MAX_LINE_QTY};

// =============================================================================
// Mutation Kind
// =============================================================================

/// The named action a constraint is asked to judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// An item is being added (single or multi-add).
    Adding,
    /// An item is being removed (partial or full).
    Removing,
    /// An item is being mutated in place.
    Updating,
}

// =============================================================================
// Context & Verdict
// =============================================================================

/// Snapshot handed to every constraint: the basket's current items, the
/// item under mutation, and the quantity the mutation introduces
/// (the add count for `Adding`, 0 otherwise).
pub struct ConstraintContext<'a> {
    /// Current collection state, before the mutation is applied.
    pub items: &'a ItemCollection,
    /// The resolved item the mutation concerns.
    pub item: &'a Item,
    /// Quantity being introduced by the mutation.
    pub qty: i64,
}

/// Outcome of evaluating one constraint (or a whole set).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The mutation is permitted.
    Pass,
    /// The mutation is rejected, with a human-readable reason for the UI.
    Fail(String),
}

impl Verdict {
    /// Rejection with the given reason.
    pub fn fail(reason: impl Into<String>) -> Self {
        Verdict::Fail(reason.into())
    }

    /// True when the mutation is permitted.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

// =============================================================================
// Constraint Trait
// =============================================================================

/// A named-action validation rule.
///
/// Implementations judge only the actions they care about and return
/// `Verdict::Pass` for everything else.
pub trait Constraint: Send + Sync {
    /// Judges the proposed mutation.
    fn evaluate(&self, ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict;
}

// =============================================================================
// Constraint Set
// =============================================================================

/// Ordered set of registered constraints.
///
/// Evaluation runs in registration order and short-circuits at the first
/// failure; the failing constraint's reason is the one surfaced.
#[derive(Default)]
pub struct ConstraintSet {
    constraints: Vec<Box<dyn Constraint>>,
}

impl ConstraintSet {
    /// Empty set (every mutation passes).
    pub fn new() -> Self {
        ConstraintSet {
            constraints: Vec::new(),
        }
    }

    /// Registers a constraint at the end of the evaluation order.
    pub fn register(&mut self, constraint: impl Constraint + 'static) {
        self.constraints.push(Box::new(constraint));
    }

    /// Number of registered constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// True when no constraints are registered.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Runs all registered constraints for the named action.
    ///
    /// Stops at the first failure and returns its reason.
    pub fn evaluate(&self, ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict {
        for constraint in &self.constraints {
            if let Verdict::Fail(reason) = constraint.evaluate(ctx, kind) {
                return Verdict::Fail(reason);
            }
        }

        Verdict::Pass
    }
}

impl fmt::Debug for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

// =============================================================================
// Built-in Constraints
// =============================================================================

/// Rejects adds that would exceed the available stock of a tracked entity.
///
/// Looks the entity up at evaluation time so the check always sees the
/// current stock level, not the level at resolution time.
pub struct StockConstraint {
    catalog: Arc<dyn Catalog>,
}

impl StockConstraint {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        StockConstraint { catalog }
    }
}

impl Constraint for StockConstraint {
    fn evaluate(&self, ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict {
        if kind != MutationKind::Adding {
            return Verdict::Pass;
        }

        let Some(entry) = self.catalog.find(&ctx.item.model_id, ctx.item.model_type) else {
            // Resolution already vouched for the identity; a resolved item
            // passed in directly may reference nothing we can stock-check.
            return Verdict::Pass;
        };

        let wanted = ctx.items.qty_of(ctx.item) + ctx.qty;
        if entry.can_sell(wanted) {
            Verdict::Pass
        } else {
            Verdict::fail(format!(
                "Only {} {} in stock",
                entry.stock.max(0),
                entry.name
            ))
        }
    }
}

/// Rejects adds that would push the basket past its line-entry limit.
pub struct LineLimitConstraint {
    max: usize,
}

impl LineLimitConstraint {
    pub fn new(max: usize) -> Self {
        LineLimitConstraint { max }
    }
}

impl Default for LineLimitConstraint {
    fn default() -> Self {
        LineLimitConstraint::new(MAX_BASKET_LINES)
    }
}

impl Constraint for LineLimitConstraint {
    fn evaluate(&self, ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict {
        // Merging into an existing line never adds an entry
        if kind == MutationKind::Adding
            && !ctx.items.has(ctx.item)
            && ctx.items.len() >= self.max
        {
            return Verdict::fail(format!("Basket cannot hold more than {} lines", self.max));
        }

        Verdict::Pass
    }
}

/// Rejects adds that would push a single line past its quantity limit.
pub struct QuantityLimitConstraint {
    max: i64,
}

impl QuantityLimitConstraint {
    pub fn new(max: i64) -> Self {
        QuantityLimitConstraint { max }
    }
}

impl Default for QuantityLimitConstraint {
    fn default() -> Self {
        QuantityLimitConstraint::new(MAX_LINE_QTY)
    }
}

impl Constraint for QuantityLimitConstraint {
    fn evaluate(&self, ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict {
        if kind == MutationKind::Adding && ctx.items.qty_of(ctx.item) + ctx.qty > self.max {
            return Verdict::fail(format!("Quantity cannot exceed {} per line", self.max));
        }

        Verdict::Pass
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{entry, FixtureCatalog, Stocked};

    /// Constraint that fails every action with a fixed reason.
    struct RejectAll(&'static str);

    impl Constraint for RejectAll {
        fn evaluate(&self, _ctx: &ConstraintContext<'_>, _kind: MutationKind) -> Verdict {
            Verdict::fail(self.0)
        }
    }

    /// Constraint that passes everything.
    struct PassAll;

    impl Constraint for PassAll {
        fn evaluate(&self, _ctx: &ConstraintContext<'_>, _kind: MutationKind) -> Verdict {
            Verdict::Pass
        }
    }

    fn ctx_fixture() -> (ItemCollection, Item) {
        let items = ItemCollection::new();
        let item = Item::from_entry(&entry("m1", "Cola", 1000));
        (items, item)
    }

    #[test]
    fn test_empty_set_passes() {
        let (items, item) = ctx_fixture();
        let set = ConstraintSet::new();
        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 1,
        };

        assert!(set.evaluate(&ctx, MutationKind::Adding).is_pass());
    }

    #[test]
    fn test_first_failure_short_circuits() {
        let (items, item) = ctx_fixture();
        let mut set = ConstraintSet::new();
        set.register(PassAll);
        set.register(RejectAll("first reason"));
        set.register(RejectAll("second reason"));

        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 1,
        };

        assert_eq!(
            set.evaluate(&ctx, MutationKind::Adding),
            Verdict::fail("first reason")
        );
    }

    #[test]
    fn test_stock_constraint_rejects_over_stock_add() {
        let catalog = FixtureCatalog::new(vec![entry("m1", "Cola", 1000).stocked(3)]);
        let constraint = StockConstraint::new(std::sync::Arc::new(catalog));

        let mut items = ItemCollection::new();
        let item = Item::from_entry(&entry("m1", "Cola", 1000));
        items.merge(item.clone(), 2);

        // 2 held + 1 more = 3, still sellable
        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 1,
        };
        assert!(constraint.evaluate(&ctx, MutationKind::Adding).is_pass());

        // 2 held + 2 more = 4 > 3 in stock
        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 2,
        };
        assert_eq!(
            constraint.evaluate(&ctx, MutationKind::Adding),
            Verdict::fail("Only 3 Cola in stock")
        );
    }

    #[test]
    fn test_stock_constraint_ignores_other_actions() {
        let catalog = FixtureCatalog::new(vec![entry("m1", "Cola", 1000).stocked(0)]);
        let constraint = StockConstraint::new(std::sync::Arc::new(catalog));
        let (items, item) = ctx_fixture();

        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 0,
        };
        assert!(constraint.evaluate(&ctx, MutationKind::Removing).is_pass());
    }

    #[test]
    fn test_line_limit_allows_merge_at_capacity() {
        let constraint = LineLimitConstraint::new(1);
        let mut items = ItemCollection::new();
        let held = Item::from_entry(&entry("m1", "Cola", 1000));
        items.merge(held.clone(), 1);

        // Same identity merges, no new line
        let ctx = ConstraintContext {
            items: &items,
            item: &held,
            qty: 1,
        };
        assert!(constraint.evaluate(&ctx, MutationKind::Adding).is_pass());

        // Different identity needs a new line
        let other = Item::from_entry(&entry("m2", "Crisps", 150));
        let ctx = ConstraintContext {
            items: &items,
            item: &other,
            qty: 1,
        };
        assert!(!constraint.evaluate(&ctx, MutationKind::Adding).is_pass());
    }

    #[test]
    fn test_quantity_limit() {
        let constraint = QuantityLimitConstraint::new(5);
        let mut items = ItemCollection::new();
        let item = Item::from_entry(&entry("m1", "Cola", 1000));
        items.merge(item.clone(), 4);

        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 1,
        };
        assert!(constraint.evaluate(&ctx, MutationKind::Adding).is_pass());

        let ctx = ConstraintContext {
            items: &items,
            item: &item,
            qty: 2,
        };
        assert_eq!(
            constraint.evaluate(&ctx, MutationKind::Adding),
            Verdict::fail("Quantity cannot exceed 5 per line")
        );
    }
}
