//! Event processors.
//!
//! - `AssignmentWatcher`: consumes order update events and dispatches a
//!   push notification when a driver is newly assigned.

pub mod assignment_watcher;

pub use assignment_watcher::{
    AssignmentWatcher, DispatchOutcome, SkipReason, WatchError, new_assignment,
};
