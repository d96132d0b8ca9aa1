//! Event values that drive the state machine.
//!
//! An event pairs a small numeric identifier with an opaque payload. The
//! engine only ever compares identifiers; the payload is carried untouched
//! from the enqueue call to the state handler that finally consumes it.

use serde::{Deserialize, Serialize};

/// Identifier for an event.
///
/// The numbering scheme belongs entirely to the client - the engine treats
/// ids as opaque comparable values. See the [`event_enum!`](crate::event_enum)
/// macro for a convenient way to declare a namespace of ids.
pub type EventId = u16;

/// A single event: an identifier plus its payload.
///
/// Events are value types. They are moved, never referenced, when they travel
/// between the active and deferred queues, and the engine never clones,
/// inspects, or drops the payload early - its lifetime is the caller's
/// business.
///
/// # Example
///
/// ```rust
/// use smengine::core::Event;
///
/// let event: Event<u32> = Event::new(3u16, 0xBEEF);
/// assert_eq!(event.id, 3);
/// assert_eq!(event.payload, 0xBEEF);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<P> {
    /// The event identifier matched against transition triggers.
    pub id: EventId,
    /// Caller-defined data carried alongside the id.
    pub payload: P,
}

impl<P> Event<P> {
    /// Create a new event.
    pub fn new(id: impl Into<EventId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_id_and_payload() {
        let event = Event::new(7u16, "payload");
        assert_eq!(event.id, 7);
        assert_eq!(event.payload, "payload");
    }

    #[test]
    fn event_is_a_value_type() {
        let event = Event::new(1u16, 42u64);
        let copied = event;
        assert_eq!(event, copied);
    }

    #[test]
    fn event_accepts_unit_payload() {
        let event: Event<()> = Event::new(9u16, ());
        assert_eq!(event.id, 9);
    }
}
