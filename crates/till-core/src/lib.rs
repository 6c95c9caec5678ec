//! # till-core: Pure Basket Engine
//!
//! This crate is the **heart** of the till point-of-sale. It contains the
//! basket engine as pure logic with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        till Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Checkout UI / HTTP layer (external)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌────────────┐ ┌──────────────┐  │   │
//! │  │   │  money   │ │   item    │ │ collection │ │    basket    │  │   │
//! │  │   │  Money   │ │   Item    │ │  ItemColl. │ │ update wrap  │  │   │
//! │  │   │  TaxRate │ │  ItemRef  │ │  Removal   │ │ settlement   │  │   │
//! │  │   └──────────┘ └───────────┘ └────────────┘ └──────────────┘  │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌────────────┐ ┌──────────────┐  │   │
//! │  │   │ catalog  │ │constraint │ │   events   │ │   payment    │  │   │
//! │  │   │ (port)   │ │  engine   │ │   buffer   │ │  strategies  │  │   │
//! │  │   └──────────┘ └───────────┘ └────────────┘ └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                till-store (catalog + transaction store)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Priced catalog types and the lookup port
//! - [`item`] - Basket items, identity, resolution, overrides
//! - [`constraint`] - Named-action mutation validators
//! - [`collection`] - The ordered unique-item container
//! - [`basket`] - The aggregate root and its atomic update wrapper
//! - [`events`] - Domain events and the collecting sink
//! - [`payment`] - Payment descriptors and amount strategies
//! - [`deal`] - Time-windowed discount descriptors
//! - [`transaction`] - Committed header/line records
//! - [`error`] - Hard-failure error types
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use till_core::basket::Basket;
//! use till_core::catalog::{Catalog, CatalogEntry, ModelType, PriceModel};
//! use till_core::item::ItemRef;
//! use till_core::money::{Money, TaxRate};
//!
//! struct OneItemCatalog(CatalogEntry);
//!
//! impl Catalog for OneItemCatalog {
//!     fn find(&self, model_id: &str, model_type: ModelType) -> Option<CatalogEntry> {
//!         (self.0.model_id == model_id && self.0.model_type == model_type)
//!             .then(|| self.0.clone())
//!     }
//! }
//!
//! let catalog = Arc::new(OneItemCatalog(CatalogEntry {
//!     model_id: "cola".into(),
//!     model_type: ModelType::Product,
//!     category_id: "drinks".into(),
//!     name: "Cola".into(),
//!     price: PriceModel::from_net(Money::from_cents(100), TaxRate::from_bps(2000)),
//!     track_stock: false,
//!     stock: 0,
//! }));
//!
//! let mut basket = Basket::new(catalog);
//! let outcome = basket.add(ItemRef::model("cola", ModelType::Product)).unwrap();
//! assert!(outcome.is_accepted());
//! assert_eq!(basket.balance().cents(), 120);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod catalog;
pub mod collection;
pub mod constraint;
pub mod deal;
pub mod error;
pub mod events;
pub mod item;
pub mod money;
pub mod payment;
pub mod transaction;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Basket` instead of
// `use till_core::basket::Basket`

pub use basket::{Basket, BasketStatus, Outcome};
pub use catalog::{Catalog, CatalogEntry, ModelType, PriceModel};
pub use collection::{GroupKey, ItemCollection, Removal};
pub use constraint::{Constraint, ConstraintContext, ConstraintSet, MutationKind, Verdict};
pub use deal::{Deal, DealHandler};
pub use error::{BasketError, BasketResult};
pub use events::{BasketEvent, EventBuffer, EventSink};
pub use item::{Item, ItemOverrides, ItemRef};
pub use money::{Money, TaxRate};
pub use payment::{
    default_payments, Card, CardGateway, Cash, FastCash, Payment, PaymentHandler, PaymentRecord,
    PaymentStrategy,
};
pub use transaction::{Transaction, TransactionHeader, TransactionLine};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line entries allowed in a single basket.
///
/// Enforced by the default `LineLimitConstraint`; prevents runaway baskets
/// and keeps transaction sizes reasonable.
pub const MAX_BASKET_LINES: usize = 100;

/// Maximum quantity of a single line in a basket.
///
/// Enforced by the default `QuantityLimitConstraint`; catches mistyped
/// quantities (1000 instead of 10) before they reach a receipt.
pub const MAX_LINE_QTY: i64 = 999;

// =============================================================================
// Shared Test Fixtures
// =============================================================================
