//! Shared application state.

use std::sync::Arc;

use docflow_session::Workspace;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The session context every handler works through.
    pub workspace: Arc<Workspace>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }
}
