//! State descriptors and the handler protocol.
//!
//! A state is two things: a static descriptor (name, transition table,
//! deferrable event ids) authored at build time, and a handler implementing
//! the four-action protocol the dispatcher speaks - guard, enter, exit,
//! internal. The descriptor is data; the handler is behavior.

use serde::{Deserialize, Serialize};

use super::event::{Event, EventId};

/// Handle to a registered state.
///
/// Ids are indices into the owning machine's descriptor table, so the
/// "are we in this state" check is plain integer equality - the interned
/// equivalent of comparing descriptor pointers. A `StateId` is only
/// meaningful for the machine whose builder produced it.
///
/// # Example
///
/// ```rust
/// use smengine::{MachineBuilder, StateHandler};
///
/// struct Idle;
/// impl StateHandler<()> for Idle {}
///
/// let mut builder: MachineBuilder<()> = MachineBuilder::new("demo");
/// let idle = builder.state("Idle", Idle);
/// let mut machine = builder.build().unwrap();
/// machine.init(idle);
/// assert!(machine.in_state(idle));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One row of a state's transition table.
///
/// Rows are scanned in declaration order; when several rows share a trigger,
/// the first one whose target's guard accepts wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEntry {
    /// Event id that activates this row.
    pub trigger: EventId,
    /// Candidate next state.
    pub target: StateId,
}

/// Static, per-state metadata.
///
/// Descriptors are immutable once the machine is built. The machine holds a
/// handle to the current one; descriptors reference each other through
/// [`StateId`] targets, forming the (possibly cyclic) state graph.
#[derive(Clone, Debug)]
pub struct StateDescriptor {
    /// Diagnostic name, used only in traces.
    pub name: &'static str,
    /// Candidate next states, in priority order.
    pub transitions: Vec<TransitionEntry>,
    /// Event ids this state allows onto the deferred queue.
    pub deferrable: Vec<EventId>,
}

impl StateDescriptor {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            transitions: Vec::new(),
            deferrable: Vec::new(),
        }
    }

    /// Whether this state permits deferring the given event id.
    pub fn can_defer(&self, id: EventId) -> bool {
        self.deferrable.contains(&id)
    }
}

/// Behavior of a single state.
///
/// The dispatcher drives every state through this trait and nothing else.
/// All four methods have defaults, so a state only spells out the actions it
/// cares about - a pure pass-through state can be a unit struct with an
/// empty `impl`.
///
/// # Contract
///
/// - [`guard`](Self::guard) is evaluated on the *candidate next* state while
///   the machine is still in the old one. It must answer whether the
///   transition may happen and must not perform side effects that assume it
///   will - a later row may win instead.
/// - [`enter`](Self::enter) runs after the machine has moved to this state.
/// - [`exit`](Self::exit) runs on the old state just before the move.
/// - [`internal`](Self::internal) runs when a transition targets the state
///   the machine is already in; no guard, exit, or enter is involved.
///
/// # Example
///
/// ```rust
/// use smengine::core::{Event, StateHandler};
///
/// struct KeyPress {
///     armed: bool,
/// }
///
/// impl StateHandler<u32> for KeyPress {
///     fn guard(&mut self, _event: &Event<u32>) -> bool {
///         self.armed
///     }
///
///     fn enter(&mut self, event: &Event<u32>) {
///         println!("key {} pressed", event.payload);
///     }
/// }
/// ```
pub trait StateHandler<P> {
    /// May the machine transition into this state on `event`?
    fn guard(&mut self, event: &Event<P>) -> bool {
        let _ = event;
        true
    }

    /// The machine has just entered this state.
    fn enter(&mut self, event: &Event<P>) {
        let _ = event;
    }

    /// The machine is about to leave this state.
    fn exit(&mut self, event: &Event<P>) {
        let _ = event;
    }

    /// React to `event` while remaining the current state.
    fn internal(&mut self, event: &Event<P>) {
        let _ = event;
    }
}
