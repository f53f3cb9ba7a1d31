//! Docflow API server entry point.

use std::sync::Arc;

use docflow_api::calendar::SimulatedCalendar;
use docflow_api::config::Config;
use docflow_api::error::AppError;
use docflow_api::routes;
use docflow_api::state::AppState;
use docflow_core::backend::DocumentBackend;
use docflow_core::clock::SystemClock;
use docflow_core::identity::AnonymousIdentityProvider;
use docflow_session::Workspace;
use docflow_store::memory::InMemoryBackend;
use docflow_store::pg::PgBackend;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("Starting Docflow API server");

    let config = Config::from_env()?;

    let backend: Arc<dyn DocumentBackend> = if let Some(database_url) = &config.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("using postgres document store");
        Arc::new(PgBackend::new(pool))
    } else {
        warn!("DATABASE_URL not set, records are kept in memory only");
        Arc::new(InMemoryBackend::new())
    };

    let workspace = Arc::new(Workspace::new(
        backend,
        Arc::new(AnonymousIdentityProvider),
        Arc::new(SystemClock),
        Arc::new(SimulatedCalendar::default()),
        config.workspace(),
    ));

    // Sign in up front; clients can retry through POST /api/v1/session.
    match workspace.sign_in(&config.credential()).await {
        Ok(actor) => info!(%actor, app_id = %config.app_id, "startup sign-in complete"),
        Err(e) => warn!(error = %e, "startup sign-in failed"),
    }

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(workspace));

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
