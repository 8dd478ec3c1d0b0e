use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::parse_status_map;
use crate::search::{SearchOptions, SearchService};

/// Sample cap for one panel refresh.
pub const STATUS_SAMPLE_SIZE: usize = 50;

/// Status label used for the "healthy systems" headline metric.
pub const NORMAL_STATUS: &str = "정상";

/// Derived per-refresh tally; never persisted or mutated incrementally.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusSummary {
    /// status label -> systems currently reporting it
    pub by_status: BTreeMap<String, BTreeSet<String>>,
    pub all_systems: BTreeSet<String>,
}

impl StatusSummary {
    pub fn total_systems(&self) -> usize {
        self.all_systems.len()
    }

    pub fn normal_systems(&self) -> usize {
        self.by_status
            .get(NORMAL_STATUS)
            .map(|systems| systems.len())
            .unwrap_or(0)
    }
}

/// Recompute the tally from a fresh sample of indexed records.
///
/// Records with an absent or unparsable status blob contribute nothing; an
/// empty or unreachable index yields an empty summary, not an error.
pub async fn system_status_summary(search: &dyn SearchService) -> StatusSummary {
    let page = match search
        .search(
            "*",
            SearchOptions {
                top: STATUS_SAMPLE_SIZE,
                select: Some("system_status,related_systems".to_string()),
                include_total_count: false,
            },
        )
        .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("status sample failed: {}", e);
            return StatusSummary::default();
        }
    };

    let mut summary = StatusSummary::default();
    for hit in &page.hits {
        let Some(pairs) = hit.system_status.as_deref().and_then(parse_status_map) else {
            continue;
        };
        for (system, status) in pairs {
            summary.all_systems.insert(system.clone());
            summary.by_status.entry(status).or_default().insert(system);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ApiError;
    use crate::models::ErrorHit;
    use crate::search::{DocumentAck, SearchPage};
    use async_trait::async_trait;
    use serde_json::{Map, Value};

    struct FakeSearch {
        hits: Vec<ErrorHit>,
        fail: bool,
    }

    #[async_trait]
    impl SearchService for FakeSearch {
        async fn search(
            &self,
            query: &str,
            options: SearchOptions,
        ) -> Result<SearchPage, ApiError> {
            assert_eq!(query, "*");
            assert_eq!(options.top, STATUS_SAMPLE_SIZE);
            assert!(options.select.as_deref().unwrap_or("").contains("system_status"));
            if self.fail {
                return Err(ApiError::Internal("index unreachable".to_string()));
            }
            Ok(SearchPage {
                total_count: None,
                hits: self.hits.clone(),
            })
        }

        async fn upload_batch(
            &self,
            _documents: &[Map<String, Value>],
        ) -> Result<Vec<DocumentAck>, ApiError> {
            unimplemented!("not used by the aggregator")
        }

        async fn delete_index(&self) -> Result<(), ApiError> {
            unimplemented!("not used by the aggregator")
        }

        async fn create_index(&self, _schema: &Value) -> Result<(), ApiError> {
            unimplemented!("not used by the aggregator")
        }
    }

    fn status_hit(blob: &str) -> ErrorHit {
        ErrorHit {
            system_status: Some(blob.to_string()),
            ..ErrorHit::default()
        }
    }

    #[tokio::test]
    async fn tallies_systems_per_status_across_records() {
        let search = FakeSearch {
            hits: vec![
                status_hit("{\"A\":\"정상\",\"B\":\"지연\"}"),
                status_hit("{\"A\":\"지연\"}"),
            ],
            fail: false,
        };

        let summary = system_status_summary(&search).await;

        assert_eq!(
            summary.by_status.get("정상"),
            Some(&BTreeSet::from(["A".to_string()]))
        );
        assert_eq!(
            summary.by_status.get("지연"),
            Some(&BTreeSet::from(["A".to_string(), "B".to_string()]))
        );
        assert_eq!(
            summary.all_systems,
            BTreeSet::from(["A".to_string(), "B".to_string()])
        );
        assert_eq!(summary.total_systems(), 2);
        assert_eq!(summary.normal_systems(), 1);
    }

    #[tokio::test]
    async fn unparsable_blobs_contribute_nothing() {
        let search = FakeSearch {
            hits: vec![
                status_hit("{broken"),
                ErrorHit::default(),
                status_hit("{\"C\":\"점검중\"}"),
            ],
            fail: false,
        };

        let summary = system_status_summary(&search).await;

        assert_eq!(summary.total_systems(), 1);
        assert!(summary.by_status.contains_key("점검중"));
    }

    #[tokio::test]
    async fn unreachable_index_yields_empty_summary() {
        let search = FakeSearch {
            hits: Vec::new(),
            fail: true,
        };

        let summary = system_status_summary(&search).await;

        assert!(summary.by_status.is_empty());
        assert!(summary.all_systems.is_empty());
        assert_eq!(summary.normal_systems(), 0);
    }
}
