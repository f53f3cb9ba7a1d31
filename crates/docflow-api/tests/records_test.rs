//! Integration tests for record CRUD and the appointment-to-receipt
//! workflow.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use docflow_core::availability::Availability;
use docflow_records::Appointment;
use docflow_store::memory::InMemoryBackend;
use serde_json::{Value, json};

fn count(expected: usize) -> impl Fn(&Value) -> bool {
    move |body| body.as_array().is_some_and(|a| a.len() == expected)
}

fn appointment_body() -> Value {
    let mut appointment = Appointment::template(common::today());
    appointment.client_name = "Grace Hopper".to_owned();
    appointment.title = "Brand Protection".to_owned();
    appointment.time = "09:30".to_owned();
    serde_json::to_value(appointment).unwrap()
}

#[tokio::test]
async fn test_create_then_get_appointment() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;

    // Act
    let (status, created) =
        common::post_json(app.clone(), "/api/v1/appointments", &appointment_body()).await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_owned();
    common::eventually(&app, "/api/v1/appointments", count(1)).await;
    let (status, body) = common::get_json(app.clone(), &format!("/api/v1/appointments/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["clientName"], "Grace Hopper");
    assert_eq!(body["status"], "Scheduled");
    assert!(
        common::notice_messages(&app)
            .await
            .contains(&"appointment added successfully!".to_owned())
    );
}

#[tokio::test]
async fn test_patch_updates_fields_and_rejects_protected_ones() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    let (_, created) =
        common::post_json(app.clone(), "/api/v1/appointments", &appointment_body()).await;
    let uri = format!("/api/v1/appointments/{}", created["id"].as_str().unwrap());
    common::eventually(&app, "/api/v1/appointments", count(1)).await;

    // Act
    let patch = json!({ "address": "1 Loop St" });
    let (updated, _) = common::patch_json(app.clone(), &uri, &patch).await;
    let (protected, error) =
        common::patch_json(app.clone(), &uri, &json!({ "status": "Completed" })).await;

    // Assert
    assert_eq!(updated, StatusCode::NO_CONTENT);
    assert_eq!(protected, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"], "validation_error");
    let body = common::eventually(&app, &uri, |b| b["address"] == "1 Loop St").await;
    assert_eq!(body["status"], "Scheduled");
}

#[tokio::test]
async fn test_delete_removes_record() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    let (_, created) =
        common::post_json(app.clone(), "/api/v1/appointments", &appointment_body()).await;
    common::eventually(&app, "/api/v1/appointments", count(1)).await;

    // Act
    let uri = format!("/api/v1/appointments/{}", created["id"].as_str().unwrap());
    let (status, _) = common::delete(app.clone(), &uri).await;

    // Assert
    assert_eq!(status, StatusCode::NO_CONTENT);
    common::eventually(&app, "/api/v1/appointments", count(0)).await;
    let (status, body) = common::get_json(app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "record_not_found");
}

#[tokio::test]
async fn test_full_workflow_from_appointment_to_receipt() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    let (_, created) =
        common::post_json(app.clone(), "/api/v1/appointments", &appointment_body()).await;
    let appointment_id = created["id"].as_str().unwrap().to_owned();
    common::eventually(&app, "/api/v1/appointments", count(1)).await;

    // Act: appointment -> quotation
    let (status, draft) = common::post_json(
        app.clone(),
        &format!("/api/v1/appointments/{appointment_id}/quotation-draft"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["appointmentId"], appointment_id.as_str());
    let mut quotation = draft.clone();
    quotation["total"] = json!(1500.0);
    let (_, created) = common::post_json(app.clone(), "/api/v1/quotations", &quotation).await;
    let quotation_id = created["id"].as_str().unwrap().to_owned();
    common::eventually(&app, "/api/v1/quotations", count(1)).await;
    let (status, changed) = common::post_json(
        app.clone(),
        &format!("/api/v1/quotations/{quotation_id}/status"),
        &json!({ "status": "Accepted" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(changed["status"], "Accepted");
    common::eventually(&app, &format!("/api/v1/quotations/{quotation_id}"), |b| {
        b["status"] == "Accepted"
    })
    .await;

    // Act: quotation -> invoice -> payment
    let (_, invoice) = common::post_json(
        app.clone(),
        &format!("/api/v1/quotations/{quotation_id}/invoice-draft"),
        &json!({}),
    )
    .await;
    assert_eq!(invoice["total"], 1500.0);
    let (_, created) = common::post_json(app.clone(), "/api/v1/invoices", &invoice).await;
    let invoice_id = created["id"].as_str().unwrap().to_owned();
    common::eventually(&app, "/api/v1/invoices", count(1)).await;
    let (status, intent) = common::post_json(
        app.clone(),
        &format!("/api/v1/invoices/{invoice_id}/payment"),
        &json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = common::post_json(app.clone(), "/api/v1/receipts", &intent["receipt"]).await;
    assert_eq!(status, StatusCode::CREATED);

    // Assert
    let receipts = common::eventually(&app, "/api/v1/receipts", count(1)).await;
    let receipt = &receipts[0];
    assert_eq!(receipt["invoiceId"], invoice_id.as_str());
    assert_eq!(receipt["amount"], 1500.0);
    assert!(
        receipt["description"]
            .as_str()
            .unwrap()
            .starts_with("Brand Protection services for the period outlined in Quotation ")
    );
    common::eventually(&app, &format!("/api/v1/invoices/{invoice_id}"), |b| {
        b["status"] == "Paid"
    })
    .await;
    let (_, source) = common::get_json(
        app.clone(),
        &format!("/api/v1/receipts/{}/source", receipt["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(source["state"], "found");
    assert_eq!(source["source"]["id"], invoice_id.as_str());
}

#[tokio::test]
async fn test_invalid_transitions_are_conflicts() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    let invoice = json!({
        "clientName": "Ada",
        "total": 10.0,
        "date": "2026-03-02",
        "status": "Pending"
    });
    let (_, created) = common::post_json(app.clone(), "/api/v1/invoices", &invoice).await;
    let invoice_id = created["id"].as_str().unwrap().to_owned();
    common::eventually(&app, "/api/v1/invoices", count(1)).await;

    // Act
    let (direct_paid, body) = common::post_json(
        app.clone(),
        &format!("/api/v1/invoices/{invoice_id}/status"),
        &json!({ "status": "Paid" }),
    )
    .await;
    let (draft_from_unknown_quotation, _) = common::post_json(
        app.clone(),
        &format!("/api/v1/quotations/{invoice_id}/invoice-draft"),
        &json!({}),
    )
    .await;

    // Assert
    assert_eq!(direct_paid, StatusCode::CONFLICT);
    assert_eq!(body["error"], "invalid_transition");
    assert_eq!(draft_from_unknown_quotation, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_receipts_have_no_status_route() {
    let app = common::build_test_app();
    common::sign_in(&app).await;

    let (status, _) = common::post_json(
        app,
        "/api/v1/receipts/00000000-0000-0000-0000-000000000000/status",
        &json!({ "status": "Paid" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_quotes_cells_and_reports_empty_collections() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    let (empty_status, empty) = common::get_json(app.clone(), "/api/v1/receipts/export").await;
    let receipt = json!({
        "clientName": "Lovelace, Ada",
        "amount": 10.0,
        "datePaid": "2026-03-02",
        "description": "said \"thanks\""
    });
    common::post_json(app.clone(), "/api/v1/receipts", &receipt).await;
    common::eventually(&app, "/api/v1/receipts", count(1)).await;

    // Act
    let (status, export) = common::get_json(app.clone(), "/api/v1/receipts/export").await;

    // Assert
    assert_eq!(empty_status, StatusCode::OK);
    assert_eq!(empty["content"], "No receipts data available for export.");
    assert_eq!(empty["rows"], 0);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["filename"], "Receipts_Export.csv");
    let content = export["content"].as_str().unwrap();
    assert!(content.contains("\"Lovelace, Ada\""));
    assert!(content.contains("\"said \"\"thanks\"\"\""));
    assert!(!content.lines().next().unwrap().contains("\"id\""));
}

#[tokio::test]
async fn test_online_appointment_needs_a_confirmed_slot() {
    // Arrange
    let app =
        common::build_test_app_with(Arc::new(InMemoryBackend::new()), Availability::Available);
    common::sign_in(&app).await;
    let mut form = appointment_body();
    form["meetingType"] = json!("Online");

    // Act
    let (unconfirmed, _) = common::post_json(app.clone(), "/api/v1/appointments", &form).await;
    let (checked, body) =
        common::post_json(app.clone(), "/api/v1/appointments/availability", &form).await;
    let (confirmed, _) =
        common::post_json(app.clone(), "/api/v1/appointments", &body["form"]).await;

    // Assert
    assert_eq!(unconfirmed, StatusCode::BAD_REQUEST);
    assert_eq!(checked, StatusCode::OK);
    assert_eq!(body["availability"], "Available");
    assert_eq!(body["form"]["isConfirmed"], true);
    assert_eq!(confirmed, StatusCode::CREATED);
}

#[tokio::test]
async fn test_busy_slot_is_reported_unconfirmed() {
    let app = common::build_test_app_with(Arc::new(InMemoryBackend::new()), Availability::Busy);
    common::sign_in(&app).await;
    let mut form = appointment_body();
    form["meetingType"] = json!("Online");

    let (status, body) =
        common::post_json(app.clone(), "/api/v1/appointments/availability", &form).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["availability"], "Busy");
    assert_eq!(body["form"]["isConfirmed"], false);
}

#[tokio::test]
async fn test_reminders_list_todays_appointment() {
    // Arrange
    let app = common::build_test_app();
    common::sign_in(&app).await;
    common::post_json(app.clone(), "/api/v1/appointments", &appointment_body()).await;
    common::eventually(&app, "/api/v1/appointments", count(1)).await;

    // Act
    let (status, reminders) = common::get_json(app, "/api/v1/reminders").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reminders[0]["kind"], "appointment_today");
    assert_eq!(reminders[0]["client"], "Grace Hopper");
    assert_eq!(reminders[0]["details"], "Today at 09:30 for Brand Protection");
}
