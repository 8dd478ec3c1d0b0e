use serde_json::{Map, Value};

use crate::search::SearchService;

pub const BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadReport {
    /// The run counts as successful when at least one document landed.
    pub fn succeeded(&self) -> bool {
        self.uploaded > 0
    }
}

/// Upload records in contiguous batches of [`BATCH_SIZE`], in original order.
///
/// Each batch is uploaded independently: per-document failures are tallied
/// from the service acks, and a batch-level transport failure counts the
/// whole batch as failed and moves on. No retry, no backoff.
pub async fn upload_records(
    search: &dyn SearchService,
    records: &[Map<String, Value>],
) -> UploadReport {
    let mut report = UploadReport::default();
    if records.is_empty() {
        tracing::warn!("no records to upload");
        return report;
    }

    let batch_count = records.len().div_ceil(BATCH_SIZE);
    tracing::info!(
        "uploading {} documents in {} batches of up to {}",
        records.len(),
        batch_count,
        BATCH_SIZE
    );

    for (batch_num, batch) in records.chunks(BATCH_SIZE).enumerate() {
        match search.upload_batch(batch).await {
            Ok(acks) => {
                let succeeded = acks.iter().filter(|a| a.succeeded).count();
                let failed = acks.len() - succeeded;
                report.uploaded += succeeded;
                report.failed += failed;

                if failed > 0 {
                    tracing::warn!(
                        "batch {}: {} uploaded, {} failed",
                        batch_num + 1,
                        succeeded,
                        failed
                    );
                    if let Some(first) = acks.iter().find(|a| !a.succeeded) {
                        tracing::warn!(
                            "  first failed key: {}, error: {}",
                            first.key,
                            first.error_message.as_deref().unwrap_or("unknown")
                        );
                    }
                } else {
                    tracing::info!("batch {}: {} uploaded", batch_num + 1, succeeded);
                }
            }
            Err(e) => {
                tracing::warn!("batch {} upload failed: {}", batch_num + 1, e);
                report.failed += batch.len();
            }
        }
    }

    tracing::info!(
        "upload finished: {} succeeded, {} failed",
        report.uploaded,
        report.failed
    );
    report
}
