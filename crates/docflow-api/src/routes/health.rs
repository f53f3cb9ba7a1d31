//! Liveness and readiness endpoints.
//!
//! Record routes answer 503 until an actor is signed in, so readiness
//! follows the session rather than the process.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use docflow_session::SessionState;
use serde::Serialize;

use crate::state::AppState;

/// Whether the workflow can accept record operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// An actor is signed in and its collections are syncing.
    Ready,
    /// A sign-in is in flight.
    SigningIn,
    /// Nobody is signed in.
    AwaitingSignIn,
}

impl From<SessionState> for Readiness {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Established(_) => Self::Ready,
            SessionState::Establishing => Self::SigningIn,
            SessionState::Uninitialized => Self::AwaitingSignIn,
        }
    }
}

/// Body of both health endpoints.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// Session readiness.
    pub readiness: Readiness,
    /// Service version.
    pub version: &'static str,
}

fn report(state: &AppState) -> HealthReport {
    HealthReport {
        readiness: state.workspace.session_state().into(),
        version: env!("CARGO_PKG_VERSION"),
    }
}

/// GET /health
async fn liveness(State(state): State<AppState>) -> Json<HealthReport> {
    Json(report(&state))
}

/// GET /health/ready
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = report(&state);
    let status = if report.readiness == Readiness::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// Returns the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness))
}
