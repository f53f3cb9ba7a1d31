//! Reminder feed.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use docflow_reminders::Reminder;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_reminders(State(state): State<AppState>) -> Result<Json<Vec<Reminder>>, ApiError> {
    Ok(Json(state.workspace.reminders().await?))
}

/// Returns the router for reminders.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_reminders))
}
