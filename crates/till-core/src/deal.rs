//! # Deals
//!
//! Time-windowed discount descriptors. A deal names a pluggable handler
//! and the window `[starts_at, ends_at]` it applies in; the discount
//! computation itself lives behind [`DealHandler`] and is supplied by the
//! deployment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::ItemCollection;
use crate::money::Money;

/// A discount handler descriptor keyed by a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Display name ("Buy One Get One Free").
    pub name: String,
    /// Window start (inclusive).
    pub starts_at: DateTime<Utc>,
    /// Window end (inclusive).
    pub ends_at: DateTime<Utc>,
}

impl Deal {
    pub fn new(
        name: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Deal {
            name: name.into(),
            starts_at,
            ends_at,
        }
    }

    /// Whether the deal applies at the given instant.
    pub fn active_at(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }
}

/// Computes the discount a deal grants over a collection.
///
/// Registered per deployment; the engine only carries the descriptor and
/// the window gate.
pub trait DealHandler: Send + Sync {
    /// Discount as a settlement ledger credit (negative reduces the
    /// balance owed).
    fn discount(&self, items: &ItemCollection) -> Money;
}
