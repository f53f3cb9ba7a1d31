//! Routes for the four record collections.
//!
//! Every collection shares the CRUD, status, source and export routes; the
//! collection a request targets travels as a request extension. Workflow
//! steps that only exist for one collection are added to its router.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use docflow_core::availability::Availability;
use docflow_core::backend::Fields;
use docflow_core::collection::CollectionName;
use docflow_export::CsvExport;
use docflow_lifecycle::domain::derivations::PaymentIntent;
use docflow_records::{AppointmentForm, Invoice, Quotation};
use docflow_session::Workspace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body after a record is created.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    /// Identifier assigned by the store.
    pub id: Uuid,
}

/// Request and response body for status changes.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusBody {
    /// Status name, e.g. `Accepted`.
    pub status: String,
}

/// Response body for an availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// What the calendar reported.
    pub availability: Availability,
    /// The form, confirmed if the slot was free.
    pub form: AppointmentForm,
}

/// GET /
#[instrument(skip(state))]
async fn list_records(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.workspace.list(collection).await?))
}

/// POST /
#[instrument(skip(state, body))]
async fn create_record(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let id = state.workspace.create(collection, body).await?;
    info!(%collection, %id, "record created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_record(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.workspace.get(collection, id).await?))
}

/// PATCH /{id}
#[instrument(skip(state, patch))]
async fn update_record(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Fields>,
) -> Result<StatusCode, ApiError> {
    state.workspace.update_fields(collection, id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /{id}
#[instrument(skip(state))]
async fn delete_record(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.workspace.delete(collection, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /{id}/status
#[instrument(skip(state, request), fields(status = %request.status))]
async fn change_status(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Path(id): Path<Uuid>,
    Json(request): Json<StatusBody>,
) -> Result<Json<StatusBody>, ApiError> {
    let status = state
        .workspace
        .change_status(collection, id, request.status)
        .await?;
    Ok(Json(StatusBody { status }))
}

/// GET /{id}/source
#[instrument(skip(state))]
async fn resolve_source(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.workspace.resolve_source(collection, id).await?))
}

/// GET /export
#[instrument(skip(state))]
async fn export_records(
    State(state): State<AppState>,
    Extension(collection): Extension<CollectionName>,
) -> Result<Json<CsvExport>, ApiError> {
    Ok(Json(state.workspace.export(collection).await?))
}

/// POST /appointments/availability
#[instrument(
    skip(state, form),
    fields(date = %form.appointment.date, time = %form.appointment.time)
)]
async fn check_availability(
    State(state): State<AppState>,
    Json(form): Json<AppointmentForm>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let form = state.workspace.check_availability(form).await?;
    Ok(Json(AvailabilityResponse {
        availability: Workspace::availability_of(&form),
        form,
    }))
}

/// POST /appointments/{id}/quotation-draft
#[instrument(skip(state))]
async fn draft_quotation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Quotation>, ApiError> {
    Ok(Json(state.workspace.draft_quotation(id).await?))
}

/// POST /quotations/{id}/invoice-draft
#[instrument(skip(state))]
async fn draft_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    Ok(Json(state.workspace.draft_invoice(id).await?))
}

/// POST /invoices/{id}/payment
#[instrument(skip(state))]
async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentIntent>, ApiError> {
    Ok(Json(state.workspace.record_payment(id).await?))
}

/// Routes every collection shares. Receipts have no status and
/// appointments have no source, so those routes are opt-in.
fn collection_router(collection: CollectionName) -> Router<AppState> {
    let mut router = Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/export", get(export_records))
        .route(
            "/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        );
    if collection != CollectionName::Receipts {
        router = router.route("/{id}/status", post(change_status));
    }
    if collection != CollectionName::Appointments {
        router = router.route("/{id}/source", get(resolve_source));
    }
    router
}

/// Returns the router for all record collections.
pub fn router() -> Router<AppState> {
    let appointments = collection_router(CollectionName::Appointments)
        .route("/availability", post(check_availability))
        .route("/{id}/quotation-draft", post(draft_quotation));
    let quotations = collection_router(CollectionName::Quotations)
        .route("/{id}/invoice-draft", post(draft_invoice));
    let invoices =
        collection_router(CollectionName::Invoices).route("/{id}/payment", post(record_payment));
    let receipts = collection_router(CollectionName::Receipts);

    Router::new()
        .nest(
            "/api/v1/appointments",
            appointments.layer(Extension(CollectionName::Appointments)),
        )
        .nest(
            "/api/v1/quotations",
            quotations.layer(Extension(CollectionName::Quotations)),
        )
        .nest(
            "/api/v1/invoices",
            invoices.layer(Extension(CollectionName::Invoices)),
        )
        .nest(
            "/api/v1/receipts",
            receipts.layer(Extension(CollectionName::Receipts)),
        )
}
