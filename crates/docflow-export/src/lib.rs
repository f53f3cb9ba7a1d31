//! Docflow — CSV export.
//!
//! Converts a collection snapshot into comma-separated text. The header row
//! lists the first record's field names, the identifier excluded. Header
//! cells are always quoted; body cells only when they contain a comma, a
//! double quote or a line break. Nested values are written as JSON text.

use docflow_core::collection::CollectionName;
use docflow_core::error::DomainError;
use docflow_core::record::{Record, Stored};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

const ID_FIELD: &str = "id";

/// A generated export, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvExport {
    /// Suggested file name.
    pub filename: String,
    /// The delimited text, or the "no data" message for an empty
    /// collection.
    pub content: String,
    /// Number of records exported.
    pub rows: usize,
}

/// Suggested file name for an export of `collection`.
#[must_use]
pub fn filename(collection: CollectionName) -> String {
    format!("{}_Export.csv", collection.title())
}

/// Text returned in place of CSV when `collection` is empty.
#[must_use]
pub fn no_data_message(collection: CollectionName) -> String {
    format!("No {collection} data available for export.")
}

/// Exports a snapshot of record kind `R`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if a record does not serialize to a
/// JSON object.
pub fn export_collection<R: Record>(snapshot: &[Stored<R>]) -> Result<CsvExport, DomainError> {
    let collection = R::COLLECTION;
    let rows = snapshot
        .iter()
        .map(|stored| to_object(collection, stored))
        .collect::<Result<Vec<_>, _>>()?;

    let content = render(collection, &rows);
    debug!(%collection, rows = rows.len(), "collection exported");
    Ok(CsvExport {
        filename: filename(collection),
        content,
        rows: rows.len(),
    })
}

fn to_object<R: Record>(
    collection: CollectionName,
    stored: &Stored<R>,
) -> Result<Map<String, Value>, DomainError> {
    match serde_json::to_value(stored) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(DomainError::Validation(format!(
            "{} record is not an object",
            collection.singular()
        ))),
        Err(e) => Err(DomainError::Validation(format!(
            "{} record could not be exported: {e}",
            collection.singular()
        ))),
    }
}

fn render(collection: CollectionName, rows: &[Map<String, Value>]) -> String {
    let Some(first) = rows.first() else {
        return no_data_message(collection);
    };
    let headers: Vec<&str> = first
        .keys()
        .map(String::as_str)
        .filter(|key| *key != ID_FIELD)
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| quote(header))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .map(|header| cell(row.get(*header)))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

fn cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    if text.contains([',', '"', '\n', '\r']) {
        quote(&text)
    } else {
        text
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use docflow_records::{Appointment, Invoice, Money, Quotation, Receipt};
    use uuid::Uuid;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    /// Splits one CSV line, honouring quoted cells and doubled quotes.
    fn split_line(line: &str) -> Vec<String> {
        let mut cells = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match (c, quoted) {
                ('"', true) if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                ('"', _) => quoted = !quoted,
                (',', false) => cells.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        cells.push(current);
        cells
    }

    #[test]
    fn test_empty_collection_yields_no_data_message() {
        // Act
        let export = export_collection::<Invoice>(&[]).unwrap();

        // Assert
        assert_eq!(export.content, "No invoices data available for export.");
        assert_eq!(export.filename, "Invoices_Export.csv");
        assert_eq!(export.rows, 0);
    }

    #[test]
    fn test_comma_in_text_field_round_trips_through_quote_aware_split() {
        // Arrange
        let mut appointment = Appointment::template(today());
        appointment.client_name = "Lovelace, Ada".to_owned();
        appointment.address = "1 \"Engine\" Row, London".to_owned();
        let snapshot = vec![Stored::new(Uuid::new_v4(), appointment)];

        // Act
        let export = export_collection(&snapshot).unwrap();

        // Assert
        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines.len(), 2);
        let headers = split_line(lines[0]);
        let cells = split_line(lines[1]);
        assert_eq!(headers.len(), cells.len());
        let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
        assert_eq!(cells[column("clientName")], "Lovelace, Ada");
        assert_eq!(cells[column("address")], "1 \"Engine\" Row, London");
    }

    #[test]
    fn test_header_is_quoted_and_excludes_identifier() {
        let snapshot = vec![Stored::new(Uuid::new_v4(), Receipt::template(today()))];

        let export = export_collection(&snapshot).unwrap();

        let header = export.content.lines().next().unwrap();
        assert_eq!(
            header,
            "\"clientName\",\"amount\",\"datePaid\",\"companyName\",\"address\",\"contact\",\"description\""
        );
    }

    #[test]
    fn test_plain_cells_are_unquoted_and_amounts_exact() {
        let mut quotation = Quotation::template(today());
        quotation.total = Money::new(1234.5678).unwrap();
        let snapshot = vec![Stored::new(Uuid::new_v4(), quotation)];

        let export = export_collection(&snapshot).unwrap();

        let row = export.content.lines().nth(1).unwrap();
        assert!(row.contains(",1234.5678,2026-03-02,Draft,Content Protection,12 Months,Net 30"));
    }

    #[test]
    fn test_columns_follow_first_record() {
        // Arrange
        let linked_to = Uuid::new_v4();
        let mut linked = Invoice::template(today());
        linked.quote_id = Some(linked_to);
        let snapshot = vec![
            Stored::new(Uuid::new_v4(), Invoice::template(today())),
            Stored::new(Uuid::new_v4(), linked),
        ];

        // Act
        let export = export_collection(&snapshot).unwrap();

        // Assert
        assert_eq!(export.rows, 2);
        assert!(!export.content.contains("quoteId"));
        assert!(!export.content.contains(&linked_to.to_string()));
    }

    #[test]
    fn test_line_break_in_cell_is_quoted() {
        assert_eq!(cell(Some(&Value::from("two\nlines"))), "\"two\nlines\"");
        assert_eq!(cell(Some(&Value::Null)), "");
        assert_eq!(
            cell(Some(&serde_json::json!({ "a": 1, "b": 2 }))),
            "\"{\"\"a\"\":1,\"\"b\"\":2}\""
        );
    }
}
