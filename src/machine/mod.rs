//! The machine instance: lifecycle, dispatch, and the event pump.
//!
//! A [`Machine`] owns the descriptor table built by
//! [`MachineBuilder`](crate::MachineBuilder), the handler for every state,
//! the two bounded queues, and the trace facade. External actors push events
//! with [`Machine::enqueue`]; at a moment of the caller's choosing,
//! [`Machine::pump`] drains the queues to a fixed point, synchronously.
//!
//! Nothing in here returns an error. Every failure mode - enqueue before
//! init, queue overflow, an event no state wants - degrades to "event
//! dropped, diagnostic emitted", so the control loop is always live.

use crate::core::{Event, EventId, EventQueue, StateDescriptor, StateHandler, StateId};
use crate::trace::{Severity, Trace, TraceConfig, TraceKind};

/// A runnable state machine instance.
///
/// Built by [`MachineBuilder`](crate::MachineBuilder); inert until
/// [`init`](Machine::init) establishes the start state. One instance is one
/// logical thread of control: `enqueue` and `pump` must not race from
/// multiple threads without external synchronization, but independent
/// instances never share anything.
///
/// # Example
///
/// ```rust
/// use smengine::{MachineBuilder, StateHandler};
///
/// struct Idle;
/// impl StateHandler<u8> for Idle {}
///
/// struct Moving;
/// impl StateHandler<u8> for Moving {}
///
/// const ACCEL: u16 = 0;
///
/// let mut builder = MachineBuilder::new("remote");
/// let idle = builder.state("Idle", Idle);
/// let moving = builder.state("Moving", Moving);
/// builder.transition(idle, ACCEL, moving);
/// let mut machine = builder.build().unwrap();
///
/// machine.init(idle);
/// machine.enqueue(ACCEL, 0u8);
/// machine.pump();
/// assert!(machine.in_state(moving));
/// ```
pub struct Machine<P> {
    descriptors: Vec<StateDescriptor>,
    handlers: Vec<Box<dyn StateHandler<P>>>,
    current: Option<StateId>,
    initialized: bool,
    active: EventQueue<P>,
    deferred: EventQueue<P>,
    trace: Trace,
}

impl<P> Machine<P> {
    pub(crate) fn assemble(
        instance: String,
        descriptors: Vec<StateDescriptor>,
        handlers: Vec<Box<dyn StateHandler<P>>>,
        active_capacity: usize,
        deferred_capacity: usize,
        trace: TraceConfig,
    ) -> Self {
        Self {
            descriptors,
            handlers,
            current: None,
            initialized: false,
            active: EventQueue::new(active_capacity),
            deferred: EventQueue::new(deferred_capacity),
            trace: Trace::new(instance, trace),
        }
    }

    /// Establish the start state and make the machine live.
    ///
    /// Resets both queues. Calling `init` again re-initializes: the current
    /// state is overwritten (no exit/enter) and any queued events are
    /// discarded.
    ///
    /// # Panics
    ///
    /// Panics if `initial` did not come from this machine's builder.
    pub fn init(&mut self, initial: StateId) {
        self.current = Some(initial);
        self.active.reset();
        self.deferred.reset();
        self.initialized = true;
        self.trace.record(
            Severity::Noise,
            TraceKind::Init,
            Some(self.descriptors[initial.index()].name),
            None,
            None,
        );
    }

    /// Push an event onto the active queue.
    ///
    /// Before `init` the event is dropped with a fatal-severity diagnostic.
    /// When the queue is full the event is dropped with a fatal-severity
    /// diagnostic. Neither case is reported to the caller; `enqueue` never
    /// blocks and never fails.
    pub fn enqueue(&mut self, id: impl Into<EventId>, payload: P) {
        let id = id.into();
        if !self.initialized {
            self.trace.record(
                Severity::Fatal,
                TraceKind::NotInitialized,
                None,
                Some(id),
                Some(self.active.len()),
            );
            return;
        }

        if self.active.enqueue(Event { id, payload }) {
            self.trace.record(
                Severity::Debug,
                TraceKind::Enqueue,
                self.current_name(),
                Some(id),
                Some(self.active.len()),
            );
        } else {
            self.trace.record(
                Severity::Fatal,
                TraceKind::QueueFull,
                self.current_name(),
                Some(id),
                Some(self.active.len()),
            );
        }
    }

    /// Drain the queues to a fixed point.
    ///
    /// Runs active passes over the active queue; after any pass that
    /// consumed at least one event, replays the deferred queue once (bounded
    /// by its length at the start of that replay - a re-deferred event is
    /// never retried within the same pass). Loops while deferred replay
    /// keeps consuming, then returns. Never blocks, never suspends.
    pub fn pump(&mut self) {
        if !self.initialized {
            self.trace
                .record(Severity::Fatal, TraceKind::NotInitialized, None, None, None);
            return;
        }

        loop {
            let active_progress = self.drain_active();

            // Only a state change can unblock a deferred event, so replay
            // is pointless unless the active pass moved the machine.
            let deferred_progress = if active_progress && !self.deferred.is_empty() {
                self.replay_deferred()
            } else {
                false
            };

            if !deferred_progress {
                break;
            }
        }

        self.trace.record(
            Severity::Debug,
            TraceKind::PumpDone,
            self.current_name(),
            None,
            Some(self.active.len() + self.deferred.len()),
        );
    }

    /// Identity check against the current state.
    pub fn in_state(&self, candidate: StateId) -> bool {
        self.current == Some(candidate)
    }

    /// The current state, if one has been established.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Overwrite the current state, bypassing guard, exit, and enter.
    ///
    /// An escape hatch for external resets. Lifecycle callbacks are skipped
    /// entirely, and a machine that was never `init`ed stays inert - forcing
    /// a state does not enable enqueuing.
    pub fn force_state(&mut self, new_state: StateId) {
        self.current = Some(new_state);
        self.trace.record(
            Severity::Noise,
            TraceKind::ForcedState,
            Some(self.descriptors[new_state.index()].name),
            None,
            None,
        );
    }

    /// Diagnostic name of a state.
    pub fn state_name(&self, id: StateId) -> &'static str {
        self.descriptors[id.index()].name
    }

    /// The descriptor registered for `id`.
    pub fn descriptor(&self, id: StateId) -> &StateDescriptor {
        &self.descriptors[id.index()]
    }

    /// Events waiting on the active queue.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Events parked on the deferred queue.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// The diagnostics facade, for inspecting retained trace records.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    fn current_name(&self) -> Option<&'static str> {
        self.current.map(|id| self.descriptors[id.index()].name)
    }

    /// Dispatch one event against the current state's transition table.
    ///
    /// Returns whether the event was consumed. Scans rows in declaration
    /// order; a self-targeted row runs `internal` and stops; a distinct
    /// target is asked via `guard`, and the first acceptance runs
    /// exit → reassign → enter and stops. Rejections keep scanning.
    fn process_event(&mut self, event: &Event<P>) -> bool {
        let Some(current) = self.current else {
            return false;
        };

        let row_count = self.descriptors[current.index()].transitions.len();
        for row in 0..row_count {
            let entry = self.descriptors[current.index()].transitions[row];
            if entry.trigger != event.id {
                continue;
            }

            let target = entry.target;
            let target_name = self.descriptors[target.index()].name;

            if target == current {
                // Internal transition: no guard, no exit, no enter.
                self.trace.record(
                    Severity::Noise,
                    TraceKind::Internal,
                    Some(target_name),
                    Some(event.id),
                    None,
                );
                self.handlers[target.index()].internal(event);
                return true;
            }

            if !self.handlers[target.index()].guard(event) {
                // A later row with the same trigger may still accept.
                self.trace.record(
                    Severity::Noise,
                    TraceKind::GuardRejected,
                    Some(target_name),
                    Some(event.id),
                    None,
                );
                continue;
            }

            let current_name = self.descriptors[current.index()].name;
            self.trace.record(
                Severity::Noise,
                TraceKind::Exit,
                Some(current_name),
                Some(event.id),
                None,
            );
            self.handlers[current.index()].exit(event);

            self.current = Some(target);

            self.trace.record(
                Severity::Noise,
                TraceKind::Enter,
                Some(target_name),
                Some(event.id),
                None,
            );
            self.handlers[target.index()].enter(event);
            return true;
        }

        false
    }

    /// Park an unconsumed event on the deferred queue, or drop it.
    ///
    /// Deferral is permitted only if the current state lists the event id as
    /// deferrable. A non-deferrable unconsumed event is a state-graph
    /// authoring bug and is logged at error severity.
    fn try_defer(&mut self, event: Event<P>) {
        let Some(current) = self.current else {
            return;
        };
        let state_name = self.descriptors[current.index()].name;

        if !self.descriptors[current.index()].can_defer(event.id) {
            self.trace.record(
                Severity::Error,
                TraceKind::Dropped,
                Some(state_name),
                Some(event.id),
                None,
            );
            return;
        }

        let id = event.id;
        if self.deferred.enqueue(event) {
            self.trace.record(
                Severity::Debug,
                TraceKind::Deferred,
                Some(state_name),
                Some(id),
                Some(self.deferred.len()),
            );
        } else {
            self.trace.record(
                Severity::Fatal,
                TraceKind::QueueFull,
                Some(state_name),
                Some(id),
                Some(self.deferred.len()),
            );
        }
    }

    /// Drain the active queue completely; returns whether anything was
    /// consumed.
    fn drain_active(&mut self) -> bool {
        let mut consumed_any = false;
        while let Some(event) = self.active.dequeue() {
            self.trace.record(
                Severity::Debug,
                TraceKind::Dequeue,
                self.current_name(),
                Some(event.id),
                Some(self.active.len()),
            );
            if self.process_event(&event) {
                consumed_any = true;
            } else {
                self.try_defer(event);
            }
        }
        consumed_any
    }

    /// Replay the deferred queue once; returns whether anything was
    /// consumed.
    ///
    /// The number of dequeue attempts is fixed to the queue length at entry,
    /// so an event that is dequeued and immediately re-deferred is not
    /// retried until a future pass. This is the bound that keeps `pump`
    /// from looping forever on a state that keeps refusing the same event.
    fn replay_deferred(&mut self) -> bool {
        let mut consumed_any = false;
        let budget = self.deferred.len();

        for _ in 0..budget {
            let Some(event) = self.deferred.dequeue() else {
                break;
            };
            self.trace.record(
                Severity::Debug,
                TraceKind::DequeueDeferred,
                self.current_name(),
                Some(event.id),
                Some(self.deferred.len()),
            );
            if self.process_event(&event) {
                consumed_any = true;
            } else {
                self.try_defer(event);
            }
        }

        consumed_any
    }
}
