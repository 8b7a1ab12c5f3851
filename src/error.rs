//! Programmer-error channel, kept separate from the `{Ok, Wait, Reschedule,
//! Failed}` control-flow verdict (see [`crate::driver::RouteOutcome`]).
//! These mirror the conditions the original guards with `ASSERT(...)`:
//! violated preconditions, not reachable-at-runtime game states.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("coordinate ({x}, {y}) lies off the map")]
    OffMap { x: i32, y: i32 },

    #[error("unit {0:?} is not registered")]
    UnknownUnit(crate::collaborators::UnitId),
}
