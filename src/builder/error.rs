//! Build errors for the machine builder.

use thiserror::Error;

use crate::core::StateId;

/// Errors that can occur when building a machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states registered. Call .state(name, handler) before .build()")]
    NoStates,

    #[error("State `{0}` registered more than once")]
    DuplicateState(&'static str),

    #[error("StateId {0:?} does not belong to this builder")]
    UnknownState(StateId),

    #[error("Queue capacity must be at least 1")]
    ZeroQueueCapacity,
}
