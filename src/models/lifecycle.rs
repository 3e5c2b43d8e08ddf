//! Checkout lifecycle states and transitions
//!
//! ```text
//! Requested --approve--> Staged --approve--> CheckedOut --return--> Returned
//!     |                    |
//!     +------reject--------+-----reject-----> Cancelled
//! ```

use std::fmt;

use crate::error::{AppError, AppResult};

/// Where a logical request currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Requested,
    Staged,
    CheckedOut,
    Returned,
    Cancelled,
}

/// Actions an ambassador can take on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Approve,
    Reject,
    Return,
}

impl LifecycleState {
    /// Compute the state reached by applying `event`
    pub fn transition(self, event: LifecycleEvent) -> AppResult<LifecycleState> {
        use LifecycleEvent::*;
        use LifecycleState::*;

        match (self, event) {
            (Requested, Approve) => Ok(Staged),
            (Staged, Approve) => Ok(CheckedOut),
            (CheckedOut, Return) => Ok(Returned),
            (Requested | Staged, Reject) => Ok(Cancelled),
            (state, event) => Err(AppError::InvalidTransition { state, event }),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Returned | LifecycleState::Cancelled)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Requested => "requested",
            LifecycleState::Staged => "staged",
            LifecycleState::CheckedOut => "checked-out",
            LifecycleState::Returned => "returned",
            LifecycleState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::Approve => "approve",
            LifecycleEvent::Reject => "reject",
            LifecycleEvent::Return => "return",
        };
        f.write_str(name)
    }
}
