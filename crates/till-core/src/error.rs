//! # Error Types
//!
//! Hard-failure error types for till-core.
//!
//! ## Two Failure Classes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Business rejection (constraint failure)                             │
//! │     NOT an error. Returned as Outcome::Rejected(reason) and retained   │
//! │     on the basket as its exception payload. The UI branches on it and  │
//! │     shows the constraint's reason string.                              │
//! │                                                                         │
//! │  2. Programming/data error (this file)                                 │
//! │     BasketError. Propagates unchanged via `?`; not recoverable at the  │
//! │     call site.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::catalog::ModelType;

// =============================================================================
// Basket Error
// =============================================================================

/// Hard failures in the basket engine.
///
/// Everything expected and user-facing (stock limits, line limits) flows
/// through the constraint gate instead and never appears here.
#[derive(Debug, Error)]
pub enum BasketError {
    /// An item reference could not be resolved against the catalog.
    ///
    /// Raised by `resolve` when the identity has no matching catalog
    /// entity. Not recoverable locally; the reference itself is wrong.
    #[error("Catalog entity not found: {model_type} {model_id}")]
    ModelNotFound {
        model_id: String,
        model_type: ModelType,
    },

    /// The basket has already been committed to a transaction.
    ///
    /// Mutation, settlement and re-commit are all refused once the basket
    /// reaches its terminal state.
    #[error("Basket {basket_id} is already committed")]
    AlreadyCommitted { basket_id: String },

    /// A mutation was requested with a non-positive count.
    #[error("Quantity must be at least 1, got {qty}")]
    InvalidQuantity { qty: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with BasketError.
pub type BasketResult<T> = Result<T, BasketError>;

// =============================================================================
// Unit Tests
// =============================================================================
