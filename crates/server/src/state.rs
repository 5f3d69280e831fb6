use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use vodpool_core::{Aggregator, Config, MergedCatalog, SanitizedConfig, SiteList};

/// Outcome summary of the most recent search.
#[derive(Debug, Clone)]
pub struct LastSearch {
    pub keyword: String,
    pub at: DateTime<Utc>,
}

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: Aggregator,
    /// Current merged catalog. Replaced wholesale after a search;
    /// readers clone the Arc and never observe a partial build.
    catalog: RwLock<Arc<MergedCatalog>>,
    /// Serializes search pipelines; concurrent purge and persist on
    /// the shared cache directory would race.
    search_lock: Mutex<()>,
    last_search: RwLock<Option<LastSearch>>,
}

impl AppState {
    pub fn new(config: Config, aggregator: Aggregator, initial: MergedCatalog) -> Self {
        Self {
            config,
            aggregator,
            catalog: RwLock::new(Arc::new(initial)),
            search_lock: Mutex::new(()),
            last_search: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn sites(&self) -> &SiteList {
        self.aggregator.sites()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Snapshot of the current merged catalog.
    pub async fn catalog(&self) -> Arc<MergedCatalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    /// Atomically replace the merged catalog.
    pub async fn replace_catalog(&self, catalog: MergedCatalog) {
        *self.catalog.write().await = Arc::new(catalog);
    }

    pub fn search_lock(&self) -> &Mutex<()> {
        &self.search_lock
    }

    pub async fn last_search(&self) -> Option<LastSearch> {
        self.last_search.read().await.clone()
    }

    pub async fn record_search(&self, keyword: &str) {
        *self.last_search.write().await = Some(LastSearch {
            keyword: keyword.to_string(),
            at: Utc::now(),
        });
    }
}
