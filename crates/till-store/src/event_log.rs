//! # Event Log
//!
//! Forwards drained basket events to `tracing`, standing in for the
//! external logging / receipt-display collaborators on the event bus.

use tracing::info;

use till_core::events::{BasketEvent, EventSink};

/// Sink that logs every basket event as a structured `info!` record.
///
/// Consumers of these log lines are idempotent on display refresh, so
/// at-least-once forwarding is fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        TracingEventSink
    }
}

impl EventSink for TracingEventSink {
    fn emit(&mut self, event: BasketEvent) {
        let kind = match &event {
            BasketEvent::ItemAdded(_) => "item_added",
            BasketEvent::ItemRemoved(_) => "item_removed",
            BasketEvent::ItemUpdated(_) => "item_updated",
        };
        let item = event.item();

        info!(
            kind = kind,
            model_id = %item.model_id,
            model_type = %item.model_type,
            qty = item.qty,
            payload = %serde_json::to_string(&event).unwrap_or_default(),
            "Basket event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use till_core::basket::Basket;
    use till_core::catalog::ModelType;
    use till_core::item::ItemRef;

    use crate::catalog::seed_demo_catalog;

    #[test]
    fn test_forwards_drained_events() {
        let catalog = Arc::new(seed_demo_catalog());
        let mut basket = Basket::new(catalog);
        basket
            .add(ItemRef::model("cola-330", ModelType::Product))
            .unwrap();

        let mut sink = TracingEventSink::new();
        for event in basket.drain_events() {
            sink.emit(event);
        }

        assert!(basket.events().is_empty());
    }
}
