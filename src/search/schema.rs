use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::search::SearchService;

/// The fixed error-index schema.
///
/// `id` is the key and exact-match only. The free-text fields are searchable;
/// `error_code` and `category` additionally carry filter flags so the panel
/// can narrow by them, and `severity`/`occurred_at` are filterable-only.
pub fn error_index_schema(index_name: &str) -> Value {
    json!({
        "name": index_name,
        "fields": [
            { "name": "id", "type": "Edm.String", "key": true,
              "searchable": false, "filterable": false, "sortable": false, "facetable": false },
            { "name": "error_code", "type": "Edm.String",
              "searchable": true, "filterable": true, "sortable": true, "facetable": false },
            { "name": "error_name", "type": "Edm.String",
              "searchable": true, "filterable": true, "sortable": false, "facetable": false },
            { "name": "description", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false },
            { "name": "symptoms", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false },
            { "name": "solution", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false },
            { "name": "category", "type": "Edm.String",
              "searchable": true, "filterable": true, "sortable": false, "facetable": true },
            { "name": "severity", "type": "Edm.String",
              "searchable": false, "filterable": true, "sortable": false, "facetable": true },
            { "name": "related_systems", "type": "Edm.String",
              "searchable": true, "filterable": true, "sortable": false, "facetable": false },
            { "name": "monitoring_points", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false },
            { "name": "prevention", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false },
            { "name": "occurred_at", "type": "Edm.DateTimeOffset",
              "searchable": false, "filterable": true, "sortable": true, "facetable": false },
            { "name": "system_status", "type": "Edm.String",
              "searchable": true, "filterable": false, "sortable": false, "facetable": false }
        ]
    })
}

/// Idempotently recreate the index: drop the existing one (tolerating "not
/// found") and create it fresh from the fixed schema. Creation errors are
/// surfaced raw.
pub async fn recreate_index(
    search: &dyn SearchService,
    index_name: &str,
) -> Result<(), ApiError> {
    search.delete_index().await?;
    tracing::info!("index '{}' dropped (or did not exist)", index_name);

    let schema = error_index_schema(index_name);
    search.create_index(&schema).await?;
    let field_count = schema
        .get("fields")
        .and_then(|v| v.as_array())
        .map(|f| f.len())
        .unwrap_or(0);
    tracing::info!("index '{}' created with {} fields", index_name, field_count);

    Ok(())
}
