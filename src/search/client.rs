use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Map, Value};

use crate::core::config::SearchSettings;
use crate::core::errors::ApiError;
use crate::models::ErrorHit;

/// REST api-version pinned for all index and document operations.
pub const SEARCH_API_VERSION: &str = "2023-11-01";

#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub top: usize,
    pub select: Option<String>,
    pub include_total_count: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub total_count: Option<i64>,
    pub hits: Vec<ErrorHit>,
}

/// Per-document acknowledgment from a batch upload.
#[derive(Debug, Clone)]
pub struct DocumentAck {
    pub key: String,
    pub succeeded: bool,
    pub error_message: Option<String>,
}

/// The slice of the managed search service this crate consumes.
///
/// The pipeline, the status panel, and the index maintenance flow all take
/// this trait so tests can substitute doubles for the live client.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Keyword search over the error index.
    async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchPage, ApiError>;

    /// Upload one contiguous batch of documents, returning per-document acks.
    async fn upload_batch(&self, documents: &[Map<String, Value>])
        -> Result<Vec<DocumentAck>, ApiError>;

    /// Delete the index. "Not found" is tolerated and reported as success.
    async fn delete_index(&self) -> Result<(), ApiError>;

    /// Create the index from a schema definition. Any service error is
    /// surfaced raw.
    async fn create_index(&self, schema: &Value) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct AzureSearchClient {
    endpoint: String,
    index_name: String,
    api_key: String,
    client: Client,
}

impl AzureSearchClient {
    pub fn new(settings: &SearchSettings, client: Client) -> Self {
        Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            index_name: settings.index_name.clone(),
            api_key: settings.api_key.clone(),
            client,
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn docs_url(&self, operation: &str) -> String {
        format!(
            "{}/indexes/{}/docs/{}?api-version={}",
            self.endpoint,
            urlencoding::encode(&self.index_name),
            operation,
            SEARCH_API_VERSION
        )
    }

    fn index_url(&self) -> String {
        format!(
            "{}/indexes/{}?api-version={}",
            self.endpoint,
            urlencoding::encode(&self.index_name),
            SEARCH_API_VERSION
        )
    }

    fn indexes_url(&self) -> String {
        format!("{}/indexes?api-version={}", self.endpoint, SEARCH_API_VERSION)
    }
}

#[async_trait]
impl SearchService for AzureSearchClient {
    async fn search(&self, query: &str, options: SearchOptions) -> Result<SearchPage, ApiError> {
        let mut body = json!({
            "search": query,
            "top": options.top,
            "count": options.include_total_count,
        });
        if let Some(obj) = body.as_object_mut() {
            if let Some(select) = &options.select {
                obj.insert("select".to_string(), json!(select));
            }
        }

        let res = self
            .client
            .post(self.docs_url("search"))
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "search request failed: {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let total_count = payload.get("@odata.count").and_then(|v| v.as_i64());
        let hits = payload
            .get("value")
            .and_then(|v| v.as_array())
            .map(|docs| {
                docs.iter()
                    .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(SearchPage { total_count, hits })
    }

    async fn upload_batch(
        &self,
        documents: &[Map<String, Value>],
    ) -> Result<Vec<DocumentAck>, ApiError> {
        let actions: Vec<Value> = documents
            .iter()
            .map(|doc| {
                let mut action = doc.clone();
                action.insert("@search.action".to_string(), json!("upload"));
                Value::Object(action)
            })
            .collect();

        let res = self
            .client
            .post(self.docs_url("index"))
            .header("api-key", &self.api_key)
            .json(&json!({ "value": actions }))
            .send()
            .await
            .map_err(ApiError::internal)?;

        // 200 on full success, 207 when some documents were rejected; both
        // carry the per-document acks.
        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "batch upload failed: {}: {}",
                status, text
            )));
        }

        let payload: Value = res.json().await.map_err(ApiError::internal)?;
        let acks = payload
            .get("value")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .map(|entry| DocumentAck {
                        key: entry
                            .get("key")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string(),
                        succeeded: entry
                            .get("status")
                            .and_then(|v| v.as_bool())
                            .unwrap_or(false),
                        error_message: entry
                            .get("errorMessage")
                            .and_then(|v| v.as_str())
                            .map(|s| s.to_string()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(acks)
    }

    async fn delete_index(&self) -> Result<(), ApiError> {
        let res = self
            .client
            .delete(self.index_url())
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if res.status().is_success() || res.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }

        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        Err(ApiError::Internal(format!(
            "index delete failed: {}: {}",
            status, text
        )))
    }

    async fn create_index(&self, schema: &Value) -> Result<(), ApiError> {
        let res = self
            .client
            .post(self.indexes_url())
            .header("api-key", &self.api_key)
            .json(schema)
            .send()
            .await
            .map_err(ApiError::internal)?;

        if res.status().is_success() {
            return Ok(());
        }

        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        Err(ApiError::Internal(format!(
            "index create failed: {}: {}",
            status, text
        )))
    }
}
