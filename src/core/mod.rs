//! Core engine types.
//!
//! This module contains the data the engine is built from:
//! - Events and their ids
//! - The bounded FIFO event queue
//! - State descriptors and the four-action handler protocol
//!
//! Everything here is passive - the dispatch and pump logic lives in
//! [`crate::machine`].

mod event;
mod queue;
mod state;

pub use event::{Event, EventId};
pub use queue::EventQueue;
pub use state::{StateDescriptor, StateHandler, StateId, TransitionEntry};
