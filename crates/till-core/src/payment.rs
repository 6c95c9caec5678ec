//! # Payment Methods
//!
//! Settlement descriptors and the polymorphic amount-computation
//! strategies behind them.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Payment { name: "Fast Cash", handler: FastCash }   ← descriptor       │
//! │                         │                                               │
//! │                         ▼                                               │
//! │  PaymentStrategy::compute_amount(basket) -> Money   ← strategy         │
//! │                                                                         │
//! │  Cash      → tendered amount as entered on the keypad                  │
//! │  FastCash  → outstanding balance, sign-inverted (single-tap settle)    │
//! │  Card      → delegated to an external gateway                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recorded amounts follow the settlement ledger convention: entries that
//! reduce the amount owed are negative (the keypad layer keys cash tender
//! as a credit), so `Basket::outstanding_balance` is a plain sum.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::basket::Basket;
use crate::money::Money;

// =============================================================================
// Descriptors
// =============================================================================

/// Which strategy variant computes the amount for a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentHandler {
    Cash,
    FastCash,
    Card,
}

/// A settlement method as presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Display name ("Cash", "Fast Cash", ...).
    pub name: String,
    /// Strategy variant that computes the amount.
    pub handler: PaymentHandler,
}

/// The stock descriptor set a fresh deployment starts with.
pub fn default_payments() -> Vec<Payment> {
    vec![
        Payment {
            name: "Cash".to_string(),
            handler: PaymentHandler::Cash,
        },
        Payment {
            name: "Card".to_string(),
            handler: PaymentHandler::Card,
        },
        Payment {
            name: "Fast Cash".to_string(),
            handler: PaymentHandler::FastCash,
        },
    ]
}

/// A settlement recorded against a basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Descriptor name at settlement time.
    pub name: String,
    /// Strategy variant that produced the amount.
    pub handler: PaymentHandler,
    /// Signed ledger amount (credits negative).
    pub amount: Money,
    /// When the settlement was recorded.
    pub recorded_at: DateTime<Utc>,
}

// =============================================================================
// Strategies
// =============================================================================

/// Computes the monetary amount associated with a settlement method.
pub trait PaymentStrategy {
    /// The signed ledger amount for this settlement.
    fn compute_amount(&self, basket: &Basket) -> Money;
}

/// Fixed tendered amount, as entered by the operator.
///
/// No computation from basket state; change handling is the caller's
/// concern.
#[derive(Debug, Clone, Copy)]
pub struct Cash {
    tendered: Money,
}

impl Cash {
    pub fn new(tendered: Money) -> Self {
        Cash { tendered }
    }
}

impl PaymentStrategy for Cash {
    fn compute_amount(&self, _basket: &Basket) -> Money {
        self.tendered
    }
}

/// Single-tap full-balance settlement.
///
/// Consumes the basket's first-class outstanding-balance query (not the
/// raw item balance), inverted in sign so the recorded credit clears the
/// basket exactly, including after partial payments.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastCash;

impl PaymentStrategy for FastCash {
    fn compute_amount(&self, basket: &Basket) -> Money {
        basket.outstanding_balance().inverted()
    }
}

/// External card gateway port. Authorization, capture and terminal I/O
/// live behind this trait, outside the engine.
pub trait CardGateway: Send + Sync {
    /// The signed ledger amount the gateway settled.
    fn compute_amount(&self, basket: &Basket) -> Money;
}

/// Card settlement: delegates amount computation to the gateway.
pub struct Card {
    gateway: Arc<dyn CardGateway>,
}

impl Card {
    pub fn new(gateway: Arc<dyn CardGateway>) -> Self {
        Card { gateway }
    }
}

impl PaymentStrategy for Card {
    fn compute_amount(&self, basket: &Basket) -> Money {
        self.gateway.compute_amount(basket)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
