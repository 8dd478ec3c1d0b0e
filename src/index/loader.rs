use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::core::errors::ApiError;

/// Fields carried by legacy exports that the index schema no longer accepts.
const REMOVED_FIELDS: [&str; 1] = ["system_resources"];

/// Textual fields that must always be present, defaulting to "".
const STRING_FIELDS: [&str; 7] = [
    "error_code",
    "error_name",
    "description",
    "symptoms",
    "solution",
    "category",
    "severity",
];

/// Load the source JSON file and normalize its records for upload.
///
/// The load fails only when the file is unreadable or the top-level document
/// is not a JSON array; individual malformed records are skipped with a
/// warning by [`normalize_records`].
pub fn load_error_records(path: &Path) -> Result<Vec<Map<String, Value>>, ApiError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        ApiError::BadRequest(format!("cannot read data file {}: {}", path.display(), e))
    })?;
    let parsed: Value = serde_json::from_str(&raw).map_err(|e| {
        ApiError::BadRequest(format!("invalid JSON in {}: {}", path.display(), e))
    })?;
    let items = parsed.as_array().ok_or_else(|| {
        ApiError::BadRequest(format!(
            "{}: expected a top-level JSON array of records",
            path.display()
        ))
    })?;

    let records = normalize_records(items);
    tracing::info!(
        "loaded {} of {} records from {}",
        records.len(),
        items.len(),
        path.display()
    );
    Ok(records)
}

/// Normalize loosely-typed records into upload-ready documents.
///
/// Per record at 0-based index `i`:
/// - assign `id = (i + 1).to_string()` when absent (stable under input order)
/// - drop the fixed removal list
/// - serialize a `system_status` object to its JSON text, key order intact
/// - force the fixed textual fields to "" when null or missing
///
/// A record that is not a JSON object is skipped with a warning.
pub fn normalize_records(items: &[Value]) -> Vec<Map<String, Value>> {
    let mut records = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let Some(source) = item.as_object() else {
            tracing::warn!("skipping record {}: not a JSON object", i);
            continue;
        };
        let mut record = source.clone();

        if !record.contains_key("id") {
            record.insert("id".to_string(), Value::String((i + 1).to_string()));
        }

        for field in REMOVED_FIELDS {
            record.remove(field);
        }

        if let Some(status) = record.get("system_status") {
            if status.is_object() {
                match serde_json::to_string(status) {
                    Ok(text) => {
                        record.insert("system_status".to_string(), Value::String(text));
                    }
                    Err(e) => {
                        tracing::warn!("record {}: cannot serialize system_status: {}", i, e);
                        record.remove("system_status");
                    }
                }
            }
        }

        for field in STRING_FIELDS {
            match record.get(field) {
                Some(Value::Null) | None => {
                    record.insert(field.to_string(), Value::String(String::new()));
                }
                Some(_) => {}
            }
        }

        records.push(record);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn assigns_sequential_ids_to_records_missing_them() {
        let items = vec![
            json!({"error_code": "MSA-001"}),
            json!({"id": "custom", "error_code": "MSA-002"}),
            json!({"error_code": "MSA-003"}),
        ];

        let records = normalize_records(&items);
        let ids: Vec<&str> = records
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();

        assert_eq!(ids, vec!["1", "custom", "3"]);
        // Stable under re-normalization of the same input order.
        let again = normalize_records(&items);
        let ids_again: Vec<&str> = again.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn normalizes_the_auth_timeout_record() {
        let items = vec![json!({
            "error_code": "MSA-001",
            "error_name": "Auth Timeout",
            "system_status": {"AuthSvc": "정상"}
        })];

        let records = normalize_records(&items);
        assert_eq!(records.len(), 1);
        let record = &records[0];

        assert_eq!(record["id"], "1");
        let status_text = record["system_status"].as_str().unwrap();
        assert_eq!(status_text, "{\"AuthSvc\":\"정상\"}");

        for field in ["description", "symptoms", "solution", "category", "severity"] {
            assert_eq!(record[field], "", "{} should default to empty", field);
        }
    }

    #[test]
    fn preserves_status_key_order_through_serialization() {
        let items = vec![json!({
            "system_status": {"ZSvc": "지연", "ASvc": "정상", "MSvc": "점검중"}
        })];

        let records = normalize_records(&items);
        let text = records[0]["system_status"].as_str().unwrap();
        assert_eq!(
            text,
            "{\"ZSvc\":\"지연\",\"ASvc\":\"정상\",\"MSvc\":\"점검중\"}"
        );
    }

    #[test]
    fn drops_legacy_fields_and_replaces_nulls() {
        let items = vec![json!({
            "error_code": "MSA-002",
            "description": null,
            "system_resources": {"cpu": "80%"},
            "occurred_at": "2024-03-01T10:00:00Z"
        })];

        let records = normalize_records(&items);
        let record = &records[0];

        assert!(!record.contains_key("system_resources"));
        assert_eq!(record["description"], "");
        // occurred_at passes through untouched.
        assert_eq!(record["occurred_at"], "2024-03-01T10:00:00Z");
    }

    #[test]
    fn non_object_records_are_skipped_not_fatal() {
        let items = vec![
            json!({"error_code": "MSA-001"}),
            json!("truncated"),
            json!({"error_code": "MSA-003"}),
        ];

        let records = normalize_records(&items);
        assert_eq!(records.len(), 2);
        // Ids track the original positions, so the surviving third record
        // keeps "3" rather than being renumbered.
        assert_eq!(records[1]["id"], "3");
    }

    #[test]
    fn string_status_blob_is_left_untouched() {
        let items = vec![json!({"system_status": "{\"AuthSvc\":\"정상\"}"})];
        let records = normalize_records(&items);
        assert_eq!(records[0]["system_status"], "{\"AuthSvc\":\"정상\"}");
    }

    #[test]
    fn load_fails_on_invalid_top_level_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[{{\"error_code\": \"MSA-001\"").unwrap();

        let err = load_error_records(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(load_error_records(&path).is_err());
    }

    #[test]
    fn load_fails_on_non_array_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"error_code\": \"MSA-001\"}}").unwrap();

        let err = load_error_records(file.path()).unwrap_err();
        assert!(err.to_string().contains("array"));
    }
}
