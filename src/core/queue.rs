//! Bounded FIFO event queue.
//!
//! A fixed-capacity circular buffer. Each machine instance owns two of these:
//! one for freshly enqueued events and one for deferred events. Storage is
//! allocated exactly once, at construction - the queue never grows, and an
//! enqueue against a full queue is a silent no-op (the machine layer is
//! responsible for the diagnostic; see the crate-level error policy).

use super::event::Event;

/// Fixed-capacity circular buffer of events.
///
/// `head` is the next slot to read, `tail` the next slot to write, both
/// wrapping modulo capacity. `count` is tracked explicitly so full and empty
/// are unambiguous.
///
/// # Example
///
/// ```rust
/// use smengine::core::{Event, EventQueue};
///
/// let mut queue: EventQueue<u8> = EventQueue::new(2);
/// assert!(queue.enqueue(Event::new(1u16, 0)));
/// assert!(queue.enqueue(Event::new(2u16, 0)));
/// // Full: dropped, not stored.
/// assert!(!queue.enqueue(Event::new(3u16, 0)));
///
/// assert_eq!(queue.dequeue().map(|e| e.id), Some(1));
/// assert_eq!(queue.dequeue().map(|e| e.id), Some(2));
/// assert_eq!(queue.dequeue(), None);
/// ```
#[derive(Debug)]
pub struct EventQueue<P> {
    head: usize,
    tail: usize,
    count: usize,
    storage: Box<[Option<Event<P>>]>,
}

impl<P> EventQueue<P> {
    /// Create a queue with the given capacity.
    ///
    /// The backing storage is allocated here and never resized.
    pub fn new(capacity: usize) -> Self {
        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, || None);
        Self {
            head: 0,
            tail: 0,
            count: 0,
            storage: storage.into_boxed_slice(),
        }
    }

    /// Maximum number of events the queue can hold.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the queue holds no events.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether the queue is at capacity.
    pub fn is_full(&self) -> bool {
        self.count == self.capacity()
    }

    /// Append an event at the tail.
    ///
    /// Returns `false` without storing anything if the queue is full. No
    /// other state is touched in that case - `head`, `tail` and `count` stay
    /// valid.
    pub fn enqueue(&mut self, event: Event<P>) -> bool {
        if self.is_full() {
            return false;
        }
        self.storage[self.tail] = Some(event);
        self.tail += 1;
        if self.tail == self.capacity() {
            self.tail = 0;
        }
        self.count += 1;
        true
    }

    /// Remove and return the event at the head, oldest first.
    pub fn dequeue(&mut self) -> Option<Event<P>> {
        if self.is_empty() {
            return None;
        }
        let event = self.storage[self.head].take();
        self.head += 1;
        if self.head == self.capacity() {
            self.head = 0;
        }
        self.count -= 1;
        event
    }

    /// Drop all queued events and rewind the indices.
    pub fn reset(&mut self) {
        for slot in self.storage.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }
}
