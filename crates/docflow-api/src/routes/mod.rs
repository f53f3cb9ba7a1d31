//! Route modules organized by concern.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod records;
pub mod reminders;
pub mod session;

/// Returns the full application router without middleware layers.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/session", session::router())
        .nest("/api/v1/notices", session::notices_router())
        .nest("/api/v1/reminders", reminders::router())
        .merge(records::router())
}
