//! Routes for the actor session and its notices.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use docflow_core::actor::ActorId;
use docflow_core::identity::Credential;
use docflow_session::{Notice, SessionState};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /api/v1/session.
#[derive(Debug, Default, Deserialize)]
pub struct SignInRequest {
    /// Token minted by the hosting environment; anonymous when absent.
    #[serde(default)]
    pub token: Option<String>,
}

/// Response body after a successful sign-in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// The established actor.
    pub actor_id: ActorId,
}

/// GET /api/v1/session
async fn session_state(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.workspace.session_state())
}

/// POST /api/v1/session
#[instrument(skip(state, request), fields(with_token = request.token.is_some()))]
async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ApiError> {
    let credential = request
        .token
        .map_or(Credential::Anonymous, Credential::CustomToken);
    let actor_id = state.workspace.sign_in(&credential).await?;
    info!(%actor_id, "signed in");
    Ok(Json(SignInResponse { actor_id }))
}

/// DELETE /api/v1/session
#[instrument(skip(state))]
async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.workspace.sign_out().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/notices
async fn active_notices(State(state): State<AppState>) -> Json<Vec<Notice>> {
    Json(state.workspace.active_notices())
}

/// Returns the router for the session.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(session_state).post(sign_in).delete(sign_out))
}

/// Returns the router for notices.
pub fn notices_router() -> Router<AppState> {
    Router::new().route("/", get(active_notices))
}
