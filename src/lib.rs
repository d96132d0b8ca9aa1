//! Smengine: a cooperative state machine engine with deferred event replay
//!
//! Smengine is a single-threaded event-driven state machine engine aimed at
//! embedded-style control logic: a remote-control device reacting to key
//! presses, accelerometer motion, and timers. Events are pushed onto a
//! bounded active queue; a synchronous pump dispatches them through a
//! guard/enter/exit/internal protocol. A state that cannot use an event yet
//! may defer it onto a second bounded queue, and deferred events are
//! replayed - at most once per pass - whenever a transition gives them a new
//! chance.
//!
//! # Core Concepts
//!
//! - **States**: registered on a [`MachineBuilder`] as a name plus a
//!   [`StateHandler`]; referenced afterwards by interned [`StateId`] handles
//! - **Guards**: the candidate next state approves or rejects each
//!   transition; rows are tried in declaration order
//! - **Deferral**: per-state lists of event ids that may be parked instead
//!   of dropped
//! - **Diagnostics**: every engine step is narrated through a
//!   runtime-configured [`Trace`] and the `log` facade
//!
//! # Example
//!
//! ```rust
//! use smengine::{Event, MachineBuilder, StateHandler};
//!
//! struct Idle;
//! impl StateHandler<u32> for Idle {}
//!
//! struct Accel;
//! impl StateHandler<u32> for Accel {
//!     fn enter(&mut self, event: &Event<u32>) {
//!         // light the backlight, start the blink timer, ...
//!         let _ = event.payload;
//!     }
//! }
//!
//! const MOVE: u16 = 0;
//! const KEY_DOWN: u16 = 1;
//!
//! let mut builder = MachineBuilder::new("remote");
//! let idle = builder.state("Idle", Idle);
//! let accel = builder.state("Accel", Accel);
//! builder.transition(idle, MOVE, accel);
//! builder.defer(idle, KEY_DOWN);
//!
//! let mut machine = builder.build().unwrap();
//! machine.init(idle);
//!
//! machine.enqueue(MOVE, 0);
//! machine.pump();
//! assert!(machine.in_state(accel));
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod trace;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use core::{Event, EventId, EventQueue, StateDescriptor, StateHandler, StateId};
pub use machine::Machine;
pub use trace::{Severity, Trace, TraceConfig, TraceKind, TraceLevel, TraceRecord};
