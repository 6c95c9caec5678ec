//! # Transaction Records
//!
//! The durable shape a committed basket is serialized into: one header per
//! checkout, one line per collection entry.
//!
//! Line values are copied from the item and its price snapshot at commit
//! time. Later catalog price changes must never alter committed lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::ModelType;
use crate::money::Money;

// =============================================================================
// Header
// =============================================================================

/// Header record for one committed basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-readable receipt number.
    pub receipt_number: String,

    /// When the basket was committed.
    pub created_at: DateTime<Utc>,
}

impl TransactionHeader {
    /// Creates a header with a fresh id, stamped now.
    pub fn new(receipt_number: impl Into<String>) -> Self {
        TransactionHeader {
            id: Uuid::new_v4().to_string(),
            receipt_number: receipt_number.into(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Line
// =============================================================================

/// One committed basket line.
///
/// A point-in-time snapshot: every monetary field is copied out of the
/// item's frozen price, never referenced back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Header this line belongs to.
    pub header_id: String,

    /// Catalog entity the basket line referenced.
    pub model_id: String,

    /// Catalog domain of the referenced entity.
    pub model_type: ModelType,

    /// Quantity sold.
    pub qty: i64,

    /// Unit net price at commit time.
    pub net: Money,

    /// Unit gross price at commit time.
    pub gross: Money,

    /// Unit VAT at commit time.
    pub vat: Money,
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed basket: header plus its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub header: TransactionHeader,
    pub lines: Vec<TransactionLine>,
}

impl Transaction {
    /// Sum of `qty * gross` across lines.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| {
                acc + line.gross.multiply_quantity(line.qty)
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
