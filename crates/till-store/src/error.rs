//! # Store Error Types
//!
//! Failures raised by the storage layer. Distinct from `BasketError`:
//! nothing here is a business rejection, these are persistence faults the
//! caller may retry or surface.

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A transaction with this header id is already stored.
    ///
    /// Commit hands out fresh UUID headers, so a duplicate means the same
    /// transaction was inserted twice (a retry that already succeeded).
    #[error("Transaction {0} already stored")]
    DuplicateTransaction(String),

    /// No transaction with this header id exists.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::DuplicateTransaction("abc".to_string());
        assert_eq!(err.to_string(), "Transaction abc already stored");

        let err = StoreError::TransactionNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Transaction not found: abc");
    }
}
