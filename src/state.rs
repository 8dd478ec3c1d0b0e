use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::config::{AppPaths, Settings};
use crate::llm::{AzureOpenAiProvider, ChatProvider};
use crate::search::{AzureSearchClient, SearchService};
use crate::session::SessionStore;

/// Long-lived application state: settings plus the two service client
/// handles, constructed once per process and shared read-mostly.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub search: Arc<dyn SearchService>,
    pub llm: Arc<dyn ChatProvider>,
    pub sessions: SessionStore,
    pub http: reqwest::Client,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn initialize(paths: Arc<AppPaths>) -> anyhow::Result<Arc<Self>> {
        let settings = Settings::from_env()?;
        let http = reqwest::Client::new();
        let search: Arc<dyn SearchService> =
            Arc::new(AzureSearchClient::new(&settings.search, http.clone()));
        let llm: Arc<dyn ChatProvider> =
            Arc::new(AzureOpenAiProvider::new(&settings.model, http.clone()));

        Ok(Arc::new(AppState {
            paths,
            settings,
            search,
            llm,
            sessions: SessionStore::new(),
            http,
            started_at: Utc::now(),
        }))
    }
}
