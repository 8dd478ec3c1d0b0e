use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One error record as returned by the search index.
///
/// String fields are normalized to empty strings at load time, so a missing
/// field here means the document predates the current schema; `default`
/// keeps deserialization tolerant either way. Projected queries (e.g. the
/// status panel's `select=system_status`) deserialize into the same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorHit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub error_code: String,
    #[serde(default)]
    pub error_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub related_systems: String,
    #[serde(default)]
    pub monitoring_points: String,
    #[serde(default)]
    pub prevention: String,
    #[serde(default)]
    pub occurred_at: Option<String>,
    /// Serialized JSON object text mapping system name to status label.
    #[serde(default)]
    pub system_status: Option<String>,
}

/// Parse a serialized system-status blob back into its key/value pairs.
///
/// Returns `None` for anything that is not a JSON object; callers treat that
/// as "contributes nothing" rather than an error.
pub fn parse_status_map(raw: &str) -> Option<Vec<(String, String)>> {
    let map: Map<String, Value> = serde_json::from_str(raw).ok()?;
    Some(
        map.into_iter()
            .map(|(system, status)| {
                let label = match status {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (system, label)
            })
            .collect(),
    )
}
