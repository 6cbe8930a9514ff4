//! Application state shared across all request handlers.

use dnotify_core::processors::AssignmentWatcher;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Handles order update events.
    pub watcher: Arc<AssignmentWatcher>,
}

impl AppState {
    /// Create a new AppState with the given watcher.
    pub fn new(watcher: Arc<AssignmentWatcher>) -> Self {
        Self { watcher }
    }
}
