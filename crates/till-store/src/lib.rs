//! # till-store: Storage Layer for till
//!
//! This crate provides the basket engine's I/O ports: catalog lookup,
//! transaction persistence and event forwarding. The implementations here
//! are in-memory references; a durable backend replaces them behind the
//! same surface.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         till Data Flow                                  │
//! │                                                                         │
//! │  Checkout flow (external)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  till-core  Basket ──resolve──► Catalog port                           │
//! │       │                             ▲                                   │
//! │       │ commit                      │ implements                        │
//! │       ▼                             │                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌──────────────────┐   ┌──────────────┐  │   │
//! │  │   │ MemoryCatalog │   │ TransactionRepo  │   │ TracingEvent │  │   │
//! │  │   │ (catalog.rs)  │   │ (transaction.rs) │   │ Sink         │  │   │
//! │  │   │ lookup port + │   │ the durable-     │   │ (event_log)  │  │   │
//! │  │   │ demo seeding  │   │ write point      │   │              │  │   │
//! │  │   └───────────────┘   └──────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - Catalog repository and demo seeding
//! - [`transaction`] - Transaction repository (async)
//! - [`event_log`] - Event forwarding to tracing
//! - [`error`] - Storage error types
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use till_core::basket::Basket;
//! use till_core::catalog::ModelType;
//! use till_core::item::ItemRef;
//! use till_core::transaction::TransactionHeader;
//! use till_store::catalog::seed_demo_catalog;
//! use till_store::transaction::TransactionRepository;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let catalog = Arc::new(seed_demo_catalog());
//! let repo = TransactionRepository::new();
//!
//! let mut basket = Basket::new(catalog);
//! basket.add(ItemRef::model("cola-330", ModelType::Product)).unwrap();
//!
//! let tx = basket.commit(TransactionHeader::new("R-0001")).unwrap();
//! repo.insert(tx).await.unwrap();
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod event_log;
pub mod transaction;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{demo_deal, seed_demo_catalog, MemoryCatalog};
pub use error::{StoreError, StoreResult};
pub use event_log::TracingEventSink;
pub use transaction::TransactionRepository;
