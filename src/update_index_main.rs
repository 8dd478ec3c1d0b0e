//! Index maintenance: recreate the error index from its fixed schema and
//! bulk-load the source records, then verify what landed.

use std::path::PathBuf;

use anyhow::{bail, Context};

use aira_backend::core::config::{AppPaths, SearchSettings};
use aira_backend::index::loader::load_error_records;
use aira_backend::index::uploader::{upload_records, BATCH_SIZE};
use aira_backend::search::schema::recreate_index;
use aira_backend::search::{AzureSearchClient, SearchOptions, SearchService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_file(&PathBuf::from(".env"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = SearchSettings::from_env()
        .context("search environment variables are not configured")?;
    let paths = AppPaths::new();

    tracing::info!("search endpoint: {}", settings.endpoint);
    tracing::info!("target index: {}", settings.index_name);

    let client = AzureSearchClient::new(&settings, reqwest::Client::new());

    recreate_index(&client, &settings.index_name)
        .await
        .context("failed to recreate the index")?;

    let records = load_error_records(&paths.data_path)
        .with_context(|| format!("failed to load {}", paths.data_path.display()))?;
    if records.is_empty() {
        bail!("no usable records in {}", paths.data_path.display());
    }
    tracing::info!(
        "uploading {} records in batches of {}",
        records.len(),
        BATCH_SIZE
    );

    let report = upload_records(&client, &records).await;
    if !report.succeeded() {
        bail!(
            "upload failed: {} succeeded, {} failed",
            report.uploaded,
            report.failed
        );
    }

    if let Err(e) = verify_upload(&client).await {
        tracing::warn!("verification failed, but some documents may have been uploaded: {}", e);
    }

    tracing::info!("index update finished");
    Ok(())
}

/// Post-upload probe: total document count plus one sample document.
async fn verify_upload(client: &AzureSearchClient) -> anyhow::Result<()> {
    let page = client
        .search(
            "*",
            SearchOptions {
                top: 1,
                select: None,
                include_total_count: true,
            },
        )
        .await?;

    let total = page.total_count.unwrap_or(0);
    tracing::info!("index now holds {} documents", total);
    if total == 0 {
        bail!("index is empty after upload");
    }

    if let Some(sample) = page.hits.first() {
        tracing::info!(
            "sample document: id={}, error_code={}, error_name={}, category={}",
            sample.id,
            sample.error_code,
            sample.error_name,
            sample.category
        );
    }

    Ok(())
}

fn load_dotenv_file(path: &std::path::Path) {
    match dotenvy::from_path(path) {
        Ok(()) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => eprintln!("warning: failed to load {}: {}", path.display(), err),
    }
}
