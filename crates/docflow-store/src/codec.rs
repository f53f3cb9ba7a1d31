//! Conversion between typed records and backend field maps.

use docflow_core::backend::{Document, Fields, Snapshot};
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored};
use serde_json::Value;
use tracing::warn;

/// Field names that belong to presentation state and must never be persisted.
pub const TRANSIENT_FIELDS: [&str; 1] = ["isConfirmed"];

/// Removes presentation-only fields from a field map.
#[must_use]
pub fn strip_transient(mut fields: Fields) -> Fields {
    for name in TRANSIENT_FIELDS {
        fields.remove(name);
    }
    fields
}

/// Encodes a record as a field map ready for the backend.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the record does not serialize to a
/// JSON object.
pub fn encode<R: Record>(record: &R) -> Result<Fields, DomainError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(fields)) => Ok(strip_transient(fields)),
        Ok(other) => Err(DomainError::Validation(format!(
            "{} record must encode to an object, got {other}",
            R::COLLECTION.singular()
        ))),
        Err(e) => Err(DomainError::Validation(format!(
            "{} record encoding failed: {e}",
            R::COLLECTION.singular()
        ))),
    }
}

/// Decodes one field map into a record.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the fields do not form a valid `R`.
pub fn decode<R: Record>(fields: Fields) -> Result<R, DomainError> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        DomainError::Validation(format!("malformed {} record: {e}", R::COLLECTION.singular()))
    })
}

/// Decodes a snapshot, skipping documents that do not form a valid `R`.
#[must_use]
pub fn decode_snapshot<R: Record>(snapshot: Snapshot) -> Vec<Stored<R>> {
    snapshot
        .documents
        .into_iter()
        .filter_map(|Document { id, fields }| match decode::<R>(fields) {
            Ok(record) => Some(Stored::new(id, record)),
            Err(e) => {
                warn!(
                    collection = %R::COLLECTION,
                    document_id = %id,
                    error = %e,
                    "skipping undecodable document"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use docflow_records::{Appointment, Quotation};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_strip_transient_removes_confirmation_flag_only() {
        let Value::Object(fields) = json!({ "clientName": "Ada", "isConfirmed": true }) else {
            unreachable!()
        };

        let stripped = strip_transient(fields);

        assert_eq!(stripped.len(), 1);
        assert!(stripped.contains_key("clientName"));
    }

    #[test]
    fn test_decode_snapshot_skips_malformed_documents() {
        // Arrange
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let good_id = Uuid::new_v4();
        let good = encode(&Appointment::template(today)).unwrap();
        let Value::Object(bad) = json!({ "status": "Archived" }) else {
            unreachable!()
        };
        let snapshot = Snapshot {
            documents: vec![
                Document { id: Uuid::new_v4(), fields: bad },
                Document { id: good_id, fields: good },
            ],
        };

        // Act
        let decoded = decode_snapshot::<Appointment>(snapshot);

        // Assert
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, good_id);
    }

    #[test]
    fn test_encode_keeps_declared_field_order() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();

        let fields = encode(&Quotation::template(today)).unwrap();
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();

        assert_eq!(
            names,
            [
                "clientName",
                "companyName",
                "address",
                "contact",
                "items",
                "total",
                "date",
                "status",
                "serviceType",
                "period",
                "paymentTerm"
            ]
        );
    }
}
