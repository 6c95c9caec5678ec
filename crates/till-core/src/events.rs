//! # Domain Events
//!
//! Events emitted by basket mutations, collected for the caller to dispatch.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mutation ──► staged into the basket's EventBuffer                      │
//! │                    │                                                    │
//! │          update committed?                                              │
//! │            │yes          │no (rejection / hard error)                   │
//! │            ▼             ▼                                              │
//! │       kept in buffer   staged events discarded                         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  caller drains and forwards to its own sink (logging, UI, receipt)     │
//! │                                                                         │
//! │  Delivery order matches mutation order. At-least-once is acceptable;   │
//! │  consumers are idempotent on display refresh.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::item::Item;

// =============================================================================
// Event Kinds
// =============================================================================

/// A domain event produced by a basket mutation.
///
/// Each variant carries the affected item as it stood when the event was
/// emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BasketEvent {
    /// An item was added (or merged into an existing line).
    ItemAdded(Item),
    /// A removal scan completed for the item.
    ItemRemoved(Item),
    /// An in-place update was applied to matching lines.
    ItemUpdated(Item),
}

impl BasketEvent {
    /// The item the event concerns.
    pub fn item(&self) -> &Item {
        match self {
            BasketEvent::ItemAdded(item)
            | BasketEvent::ItemRemoved(item)
            | BasketEvent::ItemUpdated(item) => item,
        }
    }
}

// =============================================================================
// Event Sink
// =============================================================================

/// Receiver for dispatched basket events.
///
/// The basket itself collects into an [`EventBuffer`]; callers drain the
/// buffer and forward into their own sink (a logger, a UI channel, a
/// receipt printer).
pub trait EventSink {
    /// Accepts one event.
    fn emit(&mut self, event: BasketEvent);
}

// =============================================================================
// Event Buffer
// =============================================================================

/// Collecting sink owned by the basket.
///
/// Events emitted during an atomic update are staged; the update wrapper
/// truncates back to its mark when the mutation is rolled back, so
/// rejected mutations leave no trace here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBuffer {
    events: Vec<BasketEvent>,
}

impl EventBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        EventBuffer { events: Vec::new() }
    }

    /// Events collected so far, in mutation order.
    pub fn events(&self) -> &[BasketEvent] {
        &self.events
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes all collected events, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<BasketEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rollback mark for the update wrapper.
    pub(crate) fn mark(&self) -> usize {
        self.events.len()
    }

    /// Discards events staged after the mark.
    pub(crate) fn truncate(&mut self, mark: usize) {
        self.events.truncate(mark);
    }
}

impl EventSink for EventBuffer {
    fn emit(&mut self, event: BasketEvent) {
        self.events.push(event);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::entry;

    fn added() -> BasketEvent {
        BasketEvent::ItemAdded(Item::from_entry(&entry("m1", "Cola", 1000)))
    }

    #[test]
    fn test_buffer_collects_in_order() {
        let mut buffer = EventBuffer::new();
        let item = Item::from_entry(&entry("m1", "Cola", 1000));

        buffer.emit(BasketEvent::ItemAdded(item.clone()));
        buffer.emit(BasketEvent::ItemRemoved(item.clone()));

        assert_eq!(buffer.len(), 2);
        assert!(matches!(buffer.events()[0], BasketEvent::ItemAdded(_)));
        assert!(matches!(buffer.events()[1], BasketEvent::ItemRemoved(_)));
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut buffer = EventBuffer::new();
        buffer.emit(added());

        let drained = buffer.drain();
        assert_eq!(drained.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_truncate_discards_staged_events() {
        let mut buffer = EventBuffer::new();
        buffer.emit(added());

        let mark = buffer.mark();
        buffer.emit(added());
        buffer.emit(added());
        buffer.truncate(mark);

        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_event_item_accessor() {
        let event = added();
        assert_eq!(event.item().model_id, "m1");
    }

    #[test]
    fn test_event_payload_is_tagged() {
        // External consumers key on the "kind" tag
        let json = serde_json::to_value(added()).unwrap();
        assert_eq!(json["kind"], "item_added");
        assert_eq!(json["model_id"], "m1");
    }
}
