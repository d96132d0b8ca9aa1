//! Builder API for machine construction.
//!
//! The builder is the crate's construction surface: the caller registers
//! each state (a name paired with its handler), wires the transition graph
//! in priority order, marks deferrable event ids, sizes the two queues, and
//! injects the trace configuration. `build()` validates the whole graph and
//! hands back a [`Machine`] that still needs [`Machine::init`] before it
//! accepts events.

pub mod error;
pub mod macros;

pub use error::BuildError;

use crate::core::{EventId, StateDescriptor, StateHandler, StateId};
use crate::machine::Machine;
use crate::trace::TraceConfig;

const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Fluent builder for a [`Machine`].
///
/// # Example
///
/// ```rust
/// use smengine::{MachineBuilder, StateHandler};
///
/// struct Idle;
/// impl StateHandler<u32> for Idle {}
///
/// struct Accel;
/// impl StateHandler<u32> for Accel {}
///
/// const MOVE: u16 = 0;
///
/// let mut builder = MachineBuilder::new("remote");
/// let idle = builder.state("Idle", Idle);
/// let accel = builder.state("Accel", Accel);
/// builder.transition(idle, MOVE, accel);
///
/// let mut machine = builder.build().unwrap();
/// machine.init(idle);
/// machine.enqueue(MOVE, 0u32);
/// machine.pump();
/// assert!(machine.in_state(accel));
/// ```
pub struct MachineBuilder<P> {
    instance: String,
    descriptors: Vec<StateDescriptor>,
    handlers: Vec<Box<dyn StateHandler<P>>>,
    transitions: Vec<(StateId, EventId, StateId)>,
    defers: Vec<(StateId, EventId)>,
    active_capacity: usize,
    deferred_capacity: usize,
    trace: TraceConfig,
}

impl<P> MachineBuilder<P> {
    /// Create a builder for a machine with the given instance name.
    ///
    /// The name only appears in diagnostics; several independent machines
    /// can share a log sink and still be told apart.
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            descriptors: Vec::new(),
            handlers: Vec::new(),
            transitions: Vec::new(),
            defers: Vec::new(),
            active_capacity: DEFAULT_QUEUE_CAPACITY,
            deferred_capacity: DEFAULT_QUEUE_CAPACITY,
            trace: TraceConfig::default(),
        }
    }

    /// Register a state: a diagnostic name paired with its handler.
    ///
    /// Returns the [`StateId`] used to wire transitions and to query the
    /// machine later.
    pub fn state(
        &mut self,
        name: &'static str,
        handler: impl StateHandler<P> + 'static,
    ) -> StateId {
        let id = StateId(self.descriptors.len());
        self.descriptors.push(StateDescriptor::new(name));
        self.handlers.push(Box::new(handler));
        id
    }

    /// Declare a transition row for `from`.
    ///
    /// Rows are kept in declaration order, which is also their priority
    /// order when several rows share a trigger. `from == to` declares an
    /// internal transition.
    pub fn transition(
        &mut self,
        from: StateId,
        trigger: impl Into<EventId>,
        to: StateId,
    ) -> &mut Self {
        self.transitions.push((from, trigger.into(), to));
        self
    }

    /// Allow `state` to defer events with the given id.
    pub fn defer(&mut self, state: StateId, trigger: impl Into<EventId>) -> &mut Self {
        self.defers.push((state, trigger.into()));
        self
    }

    /// Capacity of the active event queue (default 16).
    pub fn active_capacity(&mut self, capacity: usize) -> &mut Self {
        self.active_capacity = capacity;
        self
    }

    /// Capacity of the deferred event queue (default 16).
    pub fn deferred_capacity(&mut self, capacity: usize) -> &mut Self {
        self.deferred_capacity = capacity;
        self
    }

    /// Inject the diagnostics configuration.
    pub fn trace(&mut self, config: TraceConfig) -> &mut Self {
        self.trace = config;
        self
    }

    /// Validate the graph and assemble the machine.
    pub fn build(mut self) -> Result<Machine<P>, BuildError> {
        if self.descriptors.is_empty() {
            return Err(BuildError::NoStates);
        }
        if self.active_capacity == 0 || self.deferred_capacity == 0 {
            return Err(BuildError::ZeroQueueCapacity);
        }
        for (idx, descriptor) in self.descriptors.iter().enumerate() {
            if self.descriptors[..idx]
                .iter()
                .any(|other| other.name == descriptor.name)
            {
                return Err(BuildError::DuplicateState(descriptor.name));
            }
        }

        let state_count = self.descriptors.len();
        let check = |id: StateId| {
            if id.index() < state_count {
                Ok(())
            } else {
                Err(BuildError::UnknownState(id))
            }
        };

        for &(from, trigger, to) in &self.transitions {
            check(from)?;
            check(to)?;
            self.descriptors[from.index()]
                .transitions
                .push(crate::core::TransitionEntry { trigger, target: to });
        }
        for &(state, trigger) in &self.defers {
            check(state)?;
            let deferrable = &mut self.descriptors[state.index()].deferrable;
            if !deferrable.contains(&trigger) {
                deferrable.push(trigger);
            }
        }

        Ok(Machine::assemble(
            self.instance,
            self.descriptors,
            self.handlers,
            self.active_capacity,
            self.deferred_capacity,
            self.trace,
        ))
    }
}
