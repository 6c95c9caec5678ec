//! # Basket
//!
//! The aggregate root: one in-progress checkout session, owning exactly one
//! item collection, a constraint set, an event buffer and a settlement
//! context.
//!
//! ## Atomic Update Wrapper
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Basket::update(mutator)                             │
//! │                                                                         │
//! │  snapshot items, mark event buffer                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  run mutator(basket)                                                   │
//! │       │                                                                 │
//! │       ├── Ok(Accepted) ────► keep new state, keep staged events        │
//! │       │                                                                 │
//! │       ├── Ok(Rejected(r)) ─► restore snapshot, discard staged events,  │
//! │       │                      retain r as the basket's exception        │
//! │       │                                                                 │
//! │       └── Err(hard) ───────► restore snapshot, discard staged events,  │
//! │                              propagate unchanged                       │
//! │                                                                         │
//! │  Nothing downstream of the wrapper observes a half-applied basket.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Constraint checks can fail deep inside a mutation; the wrapper is the
//! single commit point, so bookkeeping done before the gate fired is
//! rolled back along with everything else.
//!
//! ## Concurrency
//! One basket belongs to one operator/terminal; the wrapper is a logical
//! transaction boundary, not a lock. Deployments sharing a basket across
//! terminals must add external mutual exclusion around each `update`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::collection::{ItemCollection, Removal};
use crate::constraint::{
    ConstraintContext, ConstraintSet, LineLimitConstraint, MutationKind, QuantityLimitConstraint,
    StockConstraint, Verdict,
};
use crate::error::{BasketError, BasketResult};
use crate::events::{BasketEvent, EventBuffer, EventSink};
use crate::item::{Item, ItemOverrides, ItemRef};
use crate::money::Money;
use crate::payment::{Payment, PaymentRecord, PaymentStrategy};
use crate::transaction::{Transaction, TransactionHeader};

// =============================================================================
// Outcome & Status
// =============================================================================

/// Result value of an atomic basket update.
///
/// A rejection is an expected, user-facing outcome carrying the failing
/// constraint's reason. It is not an error and never propagates as one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied in full.
    Accepted,
    /// The mutation was rejected; the basket was rolled back.
    Rejected(String),
}

impl Outcome {
    /// True when the mutation was applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// The rejection reason, when rejected.
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Outcome::Accepted => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }
}

/// Basket lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketStatus {
    /// Accepting mutations and settlements.
    Open,
    /// Converted to a transaction; terminal.
    Committed,
}

// =============================================================================
// Basket
// =============================================================================

/// One checkout session.
pub struct Basket {
    id: String,
    catalog: Arc<dyn Catalog>,
    items: ItemCollection,
    constraints: ConstraintSet,
    events: EventBuffer,
    settlements: Vec<PaymentRecord>,
    exception: Option<String>,
    status: BasketStatus,
    created_at: DateTime<Utc>,
}

impl Basket {
    /// Creates an open basket with the default constraint set registered:
    /// stock, basket line limit, per-line quantity limit.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        let mut constraints = ConstraintSet::new();
        constraints.register(StockConstraint::new(catalog.clone()));
        constraints.register(LineLimitConstraint::default());
        constraints.register(QuantityLimitConstraint::default());

        Basket {
            id: Uuid::new_v4().to_string(),
            catalog,
            items: ItemCollection::new(),
            constraints,
            events: EventBuffer::new(),
            settlements: Vec::new(),
            exception: None,
            status: BasketStatus::Open,
            created_at: Utc::now(),
        }
    }

    /// Registers an additional constraint after the defaults.
    ///
    /// Construction-time extension point for deployment rules; the engine
    /// does not hardcode its rule set.
    pub fn with_constraint(mut self, constraint: impl crate::constraint::Constraint + 'static) -> Self {
        self.constraints.register(constraint);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Basket id (UUID v4).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current lifecycle state.
    pub fn status(&self) -> BasketStatus {
        self.status
    }

    /// True once the basket has been committed.
    pub fn is_committed(&self) -> bool {
        self.status == BasketStatus::Committed
    }

    /// When the session started.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The item collection (read-only; mutations go through the
    /// protocol methods).
    pub fn items(&self) -> &ItemCollection {
        &self.items
    }

    /// Item balance: sum of `qty * gross` across lines.
    pub fn balance(&self) -> Money {
        self.items.balance()
    }

    /// Count of all items, factoring in quantities.
    pub fn count(&self) -> i64 {
        self.items.count()
    }

    /// The reason of the most recent rejected update, if the last update
    /// was rejected. Cleared when the next update begins.
    pub fn exception(&self) -> Option<&str> {
        self.exception.as_deref()
    }

    /// Events collected so far (mutation order).
    pub fn events(&self) -> &[BasketEvent] {
        self.events.events()
    }

    /// Takes all collected events for dispatch to external consumers.
    pub fn drain_events(&mut self) -> Vec<BasketEvent> {
        self.events.drain()
    }

    // -------------------------------------------------------------------------
    // Settlement
    // -------------------------------------------------------------------------

    /// Settlements recorded against this basket.
    pub fn settlements(&self) -> &[PaymentRecord] {
        &self.settlements
    }

    /// Sum of recorded settlement ledger entries (credits are negative).
    pub fn settled_total(&self) -> Money {
        self.settlements
            .iter()
            .fold(Money::zero(), |acc, record| acc + record.amount)
    }

    /// Outstanding balance: what is still owed on this basket.
    ///
    /// Ledger convention: item charges are positive, settlement credits
    /// negative, so `outstanding = item balance + settled total` and a
    /// fully settled basket reads zero.
    pub fn outstanding_balance(&self) -> Money {
        self.items.balance() + self.settled_total()
    }

    /// Computes the amount for the given payment method and records it as
    /// a settlement ledger entry.
    pub fn settle(
        &mut self,
        payment: &Payment,
        strategy: &dyn PaymentStrategy,
    ) -> BasketResult<Money> {
        self.guard_open()?;

        let amount = strategy.compute_amount(self);
        self.settlements.push(PaymentRecord {
            name: payment.name.clone(),
            handler: payment.handler,
            amount,
            recorded_at: Utc::now(),
        });

        Ok(amount)
    }

    // -------------------------------------------------------------------------
    // Atomic Update Wrapper
    // -------------------------------------------------------------------------

    /// Runs a mutation as an atomic unit.
    ///
    /// The mutator receives the live basket and returns the outcome; on
    /// `Rejected` or a hard error the item collection is restored to its
    /// pre-mutation snapshot and events staged by the mutator are
    /// discarded. The rejection reason is retained as the basket's
    /// exception payload.
    pub fn update<F>(&mut self, mutate: F) -> BasketResult<Outcome>
    where
        F: FnOnce(&mut Basket) -> BasketResult<Outcome>,
    {
        self.guard_open()?;

        self.exception = None;
        let snapshot = self.items.clone();
        let event_mark = self.events.mark();

        match mutate(self) {
            Ok(Outcome::Accepted) => Ok(Outcome::Accepted),
            Ok(Outcome::Rejected(reason)) => {
                self.items = snapshot;
                self.events.truncate(event_mark);
                self.exception = Some(reason.clone());
                Ok(Outcome::Rejected(reason))
            }
            Err(err) => {
                self.items = snapshot;
                self.events.truncate(event_mark);
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Mutation Protocol
    // -------------------------------------------------------------------------

    /// Adds one unit of the referenced item.
    pub fn add(&mut self, item_ref: impl Into<ItemRef>) -> BasketResult<Outcome> {
        self.add_many_with(item_ref, 1, ItemOverrides::none())
    }

    /// Adds one unit with overrides applied after resolution.
    pub fn add_with(
        &mut self,
        item_ref: impl Into<ItemRef>,
        overrides: ItemOverrides,
    ) -> BasketResult<Outcome> {
        self.add_many_with(item_ref, 1, overrides)
    }

    /// Adds `count` units of the referenced item.
    pub fn add_many(&mut self, item_ref: impl Into<ItemRef>, count: i64) -> BasketResult<Outcome> {
        self.add_many_with(item_ref, count, ItemOverrides::none())
    }

    /// Adds `count` units with overrides applied after resolution.
    ///
    /// ## Protocol
    /// 1. Resolve the reference to a canonical item.
    /// 2. Gate through constraints for `Adding` (full count in context);
    ///    a failing gate rejects the whole mutation, leaves the collection
    ///    untouched and emits nothing.
    /// 3. Merge by identity: an existing matching line grows by `count`,
    ///    otherwise the item is inserted and topped up to `count`. Two
    ///    lines never share an identity.
    /// 4. Emit `ItemAdded` carrying the affected line.
    pub fn add_many_with(
        &mut self,
        item_ref: impl Into<ItemRef>,
        count: i64,
        overrides: ItemOverrides,
    ) -> BasketResult<Outcome> {
        if count < 1 {
            return Err(BasketError::InvalidQuantity { qty: count });
        }

        let item_ref = item_ref.into();
        self.update(move |basket| {
            let item = item_ref.resolve(basket.catalog.as_ref(), &overrides)?;

            let verdict = basket.constraints.evaluate(
                &ConstraintContext {
                    items: &basket.items,
                    item: &item,
                    qty: count,
                },
                MutationKind::Adding,
            );
            if let Verdict::Fail(reason) = verdict {
                return Ok(Outcome::Rejected(reason));
            }

            basket.items.merge(item.clone(), count);

            // The event carries the line as stored (merged quantity), not
            // the incoming unit.
            let stored = basket.items.find(&item).cloned().unwrap_or(item);
            basket.events.emit(BasketEvent::ItemAdded(stored));

            Ok(Outcome::Accepted)
        })
    }

    /// Removes the item according to the removal policy.
    ///
    /// Scans the collection once; matching entries are dropped or
    /// decremented (never stored at zero), non-matching entries keep
    /// their order. One `ItemRemoved` event per call, after the scan.
    pub fn remove(&mut self, item: &Item, removal: Removal) -> BasketResult<Outcome> {
        if let Removal::Count(qty) = removal {
            if qty < 1 {
                return Err(BasketError::InvalidQuantity { qty });
            }
        }

        let target = item.clone();
        self.update(move |basket| {
            let verdict = basket.constraints.evaluate(
                &ConstraintContext {
                    items: &basket.items,
                    item: &target,
                    qty: 0,
                },
                MutationKind::Removing,
            );
            if let Verdict::Fail(reason) = verdict {
                return Ok(Outcome::Rejected(reason));
            }

            basket.items.remove(&target, removal);
            basket.events.emit(BasketEvent::ItemRemoved(target));

            Ok(Outcome::Accepted)
        })
    }

    /// Applies the mutator to every line matching the item by identity.
    ///
    /// Lines left with `qty <= 0` are purged. One `ItemUpdated` event per
    /// call.
    pub fn update_item<F>(&mut self, item: &Item, mutator: F) -> BasketResult<Outcome>
    where
        F: Fn(&mut Item),
    {
        let target = item.clone();
        self.update(move |basket| {
            let verdict = basket.constraints.evaluate(
                &ConstraintContext {
                    items: &basket.items,
                    item: &target,
                    qty: 0,
                },
                MutationKind::Updating,
            );
            if let Verdict::Fail(reason) = verdict {
                return Ok(Outcome::Rejected(reason));
            }

            basket.items.apply(&target, &mutator);
            basket.events.emit(BasketEvent::ItemUpdated(target));

            Ok(Outcome::Accepted)
        })
    }

    /// Empties the basket.
    pub fn clear(&mut self) -> BasketResult<()> {
        self.guard_open()?;
        self.items.clear();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------------

    /// Converts the basket into a transaction under the given header.
    ///
    /// Line values are copied from the frozen item prices at this moment;
    /// the basket transitions to its terminal `Committed` state and
    /// refuses further mutation, settlement and re-commit.
    pub fn commit(&mut self, header: TransactionHeader) -> BasketResult<Transaction> {
        self.guard_open()?;

        let lines = self.items.commit(&header);
        self.status = BasketStatus::Committed;

        Ok(Transaction { header, lines })
    }

    fn guard_open(&self) -> BasketResult<()> {
        match self.status {
            BasketStatus::Open => Ok(()),
            BasketStatus::Committed => Err(BasketError::AlreadyCommitted {
                basket_id: self.id.clone(),
            }),
        }
    }
}

impl fmt::Debug for Basket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Basket")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("lines", &self.items.len())
            .field("balance", &self.items.balance())
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use crate::item::Item;
    use crate::payment::{default_payments, Cash, FastCash, PaymentHandler};
    use crate::testutil::{entry, FixtureCatalog, Stocked};

    fn catalog() -> Arc<FixtureCatalog> {
        Arc::new(FixtureCatalog::new(vec![
            entry("cola", "Cola", 120),
            entry("crisps", "Crisps", 85),
            entry("scarce", "Scarce", 500).stocked(2),
        ]))
    }

    fn cola() -> ItemRef {
        ItemRef::model("cola", crate::catalog::ModelType::Product)
    }

    fn cola_item(basket: &Basket) -> Item {
        basket
            .items()
            .iter()
            .find(|i| i.model_id == "cola")
            .cloned()
            .unwrap()
    }

    /// Rejects every add with a fixed reason.
    struct NoAdds;

    impl Constraint for NoAdds {
        fn evaluate(&self, _ctx: &ConstraintContext<'_>, kind: MutationKind) -> Verdict {
            match kind {
                MutationKind::Adding => Verdict::fail("till closed"),
                _ => Verdict::Pass,
            }
        }
    }

    #[test]
    fn test_add_merges_and_counts() {
        let mut basket = Basket::new(catalog());

        for _ in 0..3 {
            assert!(basket.add(cola()).unwrap().is_accepted());
        }

        assert_eq!(basket.items().len(), 1);
        assert_eq!(basket.count(), 3);
        assert_eq!(basket.balance().cents(), 360);
    }

    #[test]
    fn test_add_many_equivalent_to_sequential_adds() {
        let mut sequential = Basket::new(catalog());
        for _ in 0..5 {
            sequential.add(cola()).unwrap();
        }

        let mut multi = Basket::new(catalog());
        multi.add_many(cola(), 5).unwrap();

        assert_eq!(sequential.items(), multi.items());
    }

    #[test]
    fn test_add_unknown_model_is_hard_error() {
        let mut basket = Basket::new(catalog());

        let err = basket
            .add(ItemRef::model("ghost", crate::catalog::ModelType::Product))
            .unwrap_err();

        assert!(matches!(err, BasketError::ModelNotFound { .. }));
        assert!(basket.items().is_empty());
        assert!(basket.events().is_empty());
    }

    #[test]
    fn test_add_zero_count_is_hard_error() {
        let mut basket = Basket::new(catalog());
        assert!(matches!(
            basket.add_many(cola(), 0),
            Err(BasketError::InvalidQuantity { qty: 0 })
        ));
    }

    #[test]
    fn test_rejected_add_rolls_back_and_emits_nothing() {
        let mut basket = Basket::new(catalog()).with_constraint(NoAdds);

        let outcome = basket.add(cola()).unwrap();

        assert_eq!(outcome, Outcome::Rejected("till closed".to_string()));
        assert_eq!(basket.exception(), Some("till closed"));
        assert!(basket.items().is_empty());
        assert!(basket.events().is_empty());
    }

    #[test]
    fn test_exception_clears_on_next_update() {
        let mut basket = Basket::new(catalog());

        // Over-stock add rejects and retains the reason
        let outcome = basket.add_many(
            ItemRef::model("scarce", crate::catalog::ModelType::Product),
            3,
        );
        assert_eq!(
            outcome.unwrap(),
            Outcome::Rejected("Only 2 Scarce in stock".to_string())
        );
        assert_eq!(basket.exception(), Some("Only 2 Scarce in stock"));

        basket.add(cola()).unwrap();
        assert_eq!(basket.exception(), None);
    }

    #[test]
    fn test_stock_constraint_counts_held_quantity() {
        let mut basket = Basket::new(catalog());
        let scarce = ItemRef::model("scarce", crate::catalog::ModelType::Product);

        assert!(basket.add(scarce.clone()).unwrap().is_accepted());
        assert!(basket.add(scarce.clone()).unwrap().is_accepted());

        // Third unit exceeds the 2 in stock
        let outcome = basket.add(scarce).unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(basket.count(), 2);
    }

    #[test]
    fn test_add_emits_event_with_merged_line() {
        let mut basket = Basket::new(catalog());
        basket.add(cola()).unwrap();
        basket.add(cola()).unwrap();

        let events = basket.drain_events();
        assert_eq!(events.len(), 2);
        match &events[1] {
            BasketEvent::ItemAdded(item) => assert_eq!(item.qty, 2),
            other => panic!("expected ItemAdded, got {:?}", other),
        }
        assert!(basket.events().is_empty());
    }

    #[test]
    fn test_remove_all_then_has_is_false() {
        let mut basket = Basket::new(catalog());
        basket.add(cola()).unwrap();
        let item = cola_item(&basket);

        basket.remove(&item, Removal::All).unwrap();

        assert!(!basket.items().has(&item));
        let events = basket.drain_events();
        assert!(matches!(events.last(), Some(BasketEvent::ItemRemoved(_))));
    }

    #[test]
    fn test_partial_remove() {
        let mut basket = Basket::new(catalog());
        basket.add_many(cola(), 5).unwrap();
        let item = cola_item(&basket);

        basket.remove(&item, Removal::Count(2)).unwrap();

        assert_eq!(basket.items().qty_of(&item), 3);
    }

    #[test]
    fn test_update_item_applies_mutator() {
        let mut basket = Basket::new(catalog());
        basket.add(cola()).unwrap();
        let item = cola_item(&basket);

        basket
            .update_item(&item, |i| i.price.gross = Money::from_cents(99))
            .unwrap();

        assert_eq!(basket.balance().cents(), 99);
        let events = basket.drain_events();
        assert!(matches!(events.last(), Some(BasketEvent::ItemUpdated(_))));
    }

    #[test]
    fn test_overrides_apply_on_add() {
        let mut basket = Basket::new(catalog());

        basket
            .add_with(cola(), ItemOverrides::none().gross(Money::from_cents(100)))
            .unwrap();

        assert_eq!(basket.balance().cents(), 100);
    }

    #[test]
    fn test_commit_snapshot_survives_price_change() {
        let cat = catalog();
        let mut basket = Basket::new(cat.clone());
        basket.add_many(cola(), 2).unwrap();

        let tx = basket.commit(TransactionHeader::new("R-0001")).unwrap();

        // Catalog price changes after commit must not reach the lines
        cat.set_gross("cola", Money::from_cents(999));

        assert_eq!(tx.lines.len(), 1);
        assert_eq!(tx.lines[0].gross.cents(), 120);
        assert_eq!(tx.total().cents(), 240);
    }

    #[test]
    fn test_committed_basket_refuses_everything() {
        let mut basket = Basket::new(catalog());
        basket.add(cola()).unwrap();
        let item = cola_item(&basket);
        basket.commit(TransactionHeader::new("R-0001")).unwrap();

        assert!(matches!(
            basket.add(cola()),
            Err(BasketError::AlreadyCommitted { .. })
        ));
        assert!(matches!(
            basket.remove(&item, Removal::All),
            Err(BasketError::AlreadyCommitted { .. })
        ));
        assert!(matches!(
            basket.commit(TransactionHeader::new("R-0002")),
            Err(BasketError::AlreadyCommitted { .. })
        ));
        assert!(matches!(
            basket.settle(&default_payments()[0], &Cash::new(Money::from_cents(100))),
            Err(BasketError::AlreadyCommitted { .. })
        ));
    }

    #[test]
    fn test_fast_cash_clears_outstanding_balance() {
        let mut basket = Basket::new(catalog());
        basket.add_many(cola(), 2).unwrap(); // 240

        let fast_cash = Payment {
            name: "Fast Cash".to_string(),
            handler: PaymentHandler::FastCash,
        };
        let amount = basket.settle(&fast_cash, &FastCash).unwrap();

        assert_eq!(amount.cents(), -240);
        assert!(basket.outstanding_balance().is_zero());
        assert_eq!(basket.settlements().len(), 1);
    }

    #[test]
    fn test_hard_error_inside_update_rolls_back() {
        let mut basket = Basket::new(catalog());
        basket.add(cola()).unwrap();

        let err = basket
            .update(|b| {
                b.items.clear();
                Err(BasketError::InvalidQuantity { qty: -1 })
            })
            .unwrap_err();

        assert!(matches!(err, BasketError::InvalidQuantity { .. }));
        assert_eq!(basket.items().len(), 1);
    }
}
