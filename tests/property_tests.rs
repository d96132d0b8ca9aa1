//! Property-based tests for the queue and the dispatch loop.
//!
//! These tests use proptest to verify invariants hold across many randomly
//! generated operation sequences.

use proptest::prelude::*;
use smengine::core::{Event, EventQueue};
use smengine::{MachineBuilder, StateHandler};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug)]
enum QueueOp {
    Enqueue(u16),
    Dequeue,
}

fn arbitrary_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        (0u16..100).prop_map(QueueOp::Enqueue),
        Just(QueueOp::Dequeue),
    ]
}

proptest! {
    /// Against a reference deque of the same capacity, the ring buffer
    /// returns the same events in the same order, no matter how enqueues
    /// and dequeues interleave or how often the indices wrap.
    #[test]
    fn queue_matches_reference_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(arbitrary_op(), 0..64)
    ) {
        let mut queue: EventQueue<u16> = EventQueue::new(capacity);
        let mut model: VecDeque<u16> = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Enqueue(id) => {
                    let stored = queue.enqueue(Event::new(id, id));
                    if model.len() < capacity {
                        prop_assert!(stored);
                        model.push_back(id);
                    } else {
                        // Full queue: silent no-op.
                        prop_assert!(!stored);
                    }
                }
                QueueOp::Dequeue => {
                    let got = queue.dequeue().map(|e| e.id);
                    prop_assert_eq!(got, model.pop_front());
                }
            }
            prop_assert_eq!(queue.len(), model.len());
            prop_assert!(queue.len() <= capacity);
        }

        // Drain whatever is left; order must still agree.
        while let Some(expected) = model.pop_front() {
            prop_assert_eq!(queue.dequeue().map(|e| e.id), Some(expected));
        }
        prop_assert_eq!(queue.dequeue(), None);
    }

    /// Overflowing never corrupts the queue: after any number of rejected
    /// enqueues, the stored events drain in their original order.
    #[test]
    fn overflow_preserves_contents(
        capacity in 1usize..6,
        extra in 1usize..10
    ) {
        let mut queue: EventQueue<u16> = EventQueue::new(capacity);
        for id in 0..(capacity + extra) as u16 {
            queue.enqueue(Event::new(id, id));
        }

        prop_assert!(queue.is_full());
        for id in 0..capacity as u16 {
            prop_assert_eq!(queue.dequeue().map(|e| e.id), Some(id));
        }
        prop_assert_eq!(queue.dequeue(), None);
    }
}

struct Plain;
impl StateHandler<u16> for Plain {}

/// Build a small ring-shaped machine: state i moves to state i+1 (mod n) on
/// event id i.
fn ring_machine(states: usize) -> (smengine::Machine<u16>, Vec<smengine::StateId>) {
    static NAMES: [&str; 5] = ["S0", "S1", "S2", "S3", "S4"];
    let mut builder = MachineBuilder::new("ring");
    builder.active_capacity(64);
    let ids: Vec<_> = NAMES[..states]
        .iter()
        .map(|name| builder.state(name, Plain))
        .collect();
    for (i, &from) in ids.iter().enumerate() {
        builder.transition(from, i as u16, ids[(i + 1) % states]);
    }
    let machine = builder.build().unwrap();
    (machine, ids)
}

proptest! {
    /// Dispatch is deterministic: two machines built the same way and fed
    /// the same event sequence end in the same state with the same queue
    /// lengths.
    #[test]
    fn dispatch_is_deterministic(
        states in 2usize..=5,
        events in prop::collection::vec(0u16..5, 0..32)
    ) {
        let (mut first, ids) = ring_machine(states);
        let (mut second, _) = ring_machine(states);

        first.init(ids[0]);
        second.init(ids[0]);

        for &id in &events {
            first.enqueue(id, 0);
            second.enqueue(id, 0);
        }
        first.pump();
        second.pump();

        prop_assert_eq!(first.current_state(), second.current_state());
        prop_assert_eq!(first.active_len(), second.active_len());
        prop_assert_eq!(first.deferred_len(), second.deferred_len());
    }

    /// The pump always terminates and always empties the active queue, even
    /// when every event is deferrable and most are never consumed.
    #[test]
    fn pump_terminates_and_drains_active(
        events in prop::collection::vec(0u16..8, 0..32)
    ) {
        let mut builder = MachineBuilder::new("sink");
        builder.active_capacity(64);
        builder.deferred_capacity(64);
        let a = builder.state("A", Plain);
        let b = builder.state("B", Plain);
        builder.transition(a, 0u16, b);
        builder.transition(b, 0u16, a);
        for id in 1u16..8 {
            builder.defer(a, id);
            builder.defer(b, id);
        }
        let mut machine = builder.build().unwrap();

        machine.init(a);
        for &id in &events {
            machine.enqueue(id, 0);
        }
        machine.pump();

        prop_assert_eq!(machine.active_len(), 0);
    }
}
