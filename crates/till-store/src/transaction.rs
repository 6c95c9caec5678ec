//! # Transaction Repository
//!
//! Persistence for committed baskets.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transaction Lifecycle                                │
//! │                                                                         │
//! │  1. BUILD                                                              │
//! │     └── Basket::commit(header) → Transaction { header, lines }         │
//! │                                                                         │
//! │  2. PERSIST (this module)                                              │
//! │     └── insert() → header + lines stored as ONE record                 │
//! │         The single durable-write point in the system. Atomic per      │
//! │         transaction: a header is never visible without its lines.     │
//! │                                                                         │
//! │  3. READ                                                               │
//! │     └── get_by_id() / list() for receipts and end-of-day totals       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is the in-memory reference implementation. A durable backend keeps
//! the same surface and the same atomicity; `StoreError` is its signal for
//! retry-on-transient-failure policies.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use till_core::transaction::Transaction;

use crate::error::{StoreError, StoreResult};

/// Repository for committed transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionRepository {
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl TransactionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        TransactionRepository {
            transactions: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Stores a transaction.
    ///
    /// Header and lines land together; re-inserting an already-stored id
    /// fails with `DuplicateTransaction` so a retried insert that already
    /// succeeded is detectable.
    pub async fn insert(&self, transaction: Transaction) -> StoreResult<()> {
        debug!(
            id = %transaction.header.id,
            receipt_number = %transaction.header.receipt_number,
            lines = transaction.lines.len(),
            "Inserting transaction"
        );

        let mut transactions = self.transactions.write().await;

        if transactions
            .iter()
            .any(|t| t.header.id == transaction.header.id)
        {
            return Err(StoreError::DuplicateTransaction(transaction.header.id));
        }

        transactions.push(transaction);
        Ok(())
    }

    /// Gets a transaction by header id.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Transaction> {
        self.transactions
            .read()
            .await
            .iter()
            .find(|t| t.header.id == id)
            .cloned()
            .ok_or_else(|| StoreError::TransactionNotFound(id.to_string()))
    }

    /// All stored transactions, in insertion order.
    pub async fn list(&self) -> Vec<Transaction> {
        self.transactions.read().await.clone()
    }

    /// Number of stored transactions.
    pub async fn count(&self) -> usize {
        self.transactions.read().await.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use till_core::basket::Basket;
    use till_core::catalog::{ModelType, PriceModel};
    use till_core::item::ItemRef;
    use till_core::money::{Money, TaxRate};
    use till_core::transaction::TransactionHeader;

    use crate::catalog::seed_demo_catalog;

    async fn committed_transaction(catalog: Arc<crate::catalog::MemoryCatalog>) -> Transaction {
        let mut basket = Basket::new(catalog);
        basket
            .add_many(ItemRef::model("cola-330", ModelType::Product), 2)
            .unwrap();
        basket
            .add(ItemRef::model("crisps-salted", ModelType::Product))
            .unwrap();
        basket.commit(TransactionHeader::new("R-0001")).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let catalog = Arc::new(seed_demo_catalog());
        let repo = TransactionRepository::new();

        let tx = committed_transaction(catalog).await;
        let id = tx.header.id.clone();

        repo.insert(tx.clone()).await.unwrap();

        let stored = repo.get_by_id(&id).await.unwrap();
        assert_eq!(stored, tx);
        assert_eq!(stored.lines.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let catalog = Arc::new(seed_demo_catalog());
        let repo = TransactionRepository::new();

        let tx = committed_transaction(catalog).await;
        repo.insert(tx.clone()).await.unwrap();

        let err = repo.insert(tx).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTransaction(_)));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = TransactionRepository::new();
        let err = repo.get_by_id("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::TransactionNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let catalog = Arc::new(seed_demo_catalog());
        let repo = TransactionRepository::new();

        let first = committed_transaction(catalog.clone()).await;
        let second = committed_transaction(catalog).await;

        repo.insert(first.clone()).await.unwrap();
        repo.insert(second.clone()).await.unwrap();

        let listed = repo.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].header.id, first.header.id);
        assert_eq!(listed[1].header.id, second.header.id);
    }

    /// Committed and stored lines must survive later catalog price edits.
    #[tokio::test]
    async fn test_stored_lines_are_point_in_time_snapshots() {
        let catalog = Arc::new(seed_demo_catalog());
        let repo = TransactionRepository::new();

        let tx = committed_transaction(catalog.clone()).await;
        let id = tx.header.id.clone();
        let gross_before = tx.lines[0].gross;
        repo.insert(tx).await.unwrap();

        catalog.set_price(
            "cola-330",
            ModelType::Product,
            PriceModel::from_net(Money::from_cents(9999), TaxRate::from_bps(2000)),
        );

        let stored = repo.get_by_id(&id).await.unwrap();
        assert_eq!(stored.lines[0].gross, gross_before);
    }
}
