//! Multi-source search pipeline: purge → fetch → persist → merge.
//!
//! One search drives the whole pipeline sequentially. Each configured
//! source is fetched once with a bounded timeout; a failing source is
//! logged and skipped, never retried, and never aborts the others.
//! The merge step re-scans the cache directory rather than folding
//! in-memory fetch results, so the merged catalog always reflects
//! exactly what is on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{MergedCatalog, SourceCatalog};
use crate::config::SiteList;
use crate::transport::Transport;

/// Cache file extension; only these files are purged and merged.
const CACHE_EXT: &str = "json";

/// Errors that invalidate an entire search. Per-source fetch and
/// decode failures are logged, not surfaced here.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Cache purge failed: {0}")]
    CachePurge(String),

    #[error("Cache scan failed: {0}")]
    MergeScan(String),
}

/// Orchestrates one search across every configured source.
pub struct Aggregator {
    sites: SiteList,
    transport: Arc<dyn Transport>,
    cache_dir: PathBuf,
}

impl Aggregator {
    pub fn new(sites: SiteList, transport: Arc<dyn Transport>, cache_dir: PathBuf) -> Self {
        Self {
            sites,
            transport,
            cache_dir,
        }
    }

    pub fn sites(&self) -> &SiteList {
        &self.sites
    }

    /// Run the full pipeline for one keyword. Succeeds if purge and
    /// merge ran, even when individual sources failed; only one search
    /// may run at a time (callers serialize).
    pub async fn search(&self, keyword: &str) -> Result<MergedCatalog, AggregateError> {
        self.purge_cache()?;
        self.fetch_all(keyword).await;
        self.load_merged()
    }

    /// Delete every cached response so stale results from an earlier
    /// keyword never leak into the new merge. An inaccessible cache
    /// directory is fatal; a single stubborn file is not.
    fn purge_cache(&self) -> Result<(), AggregateError> {
        let entries = std::fs::read_dir(&self.cache_dir)
            .map_err(|e| AggregateError::CachePurge(format!("{}: {}", self.cache_dir.display(), e)))?;

        let mut deleted = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) => warn!(file = %path.display(), error = %e, "Failed to delete cache file"),
            }
        }

        debug!(deleted, "Cache purged");
        Ok(())
    }

    /// Sequential fetch pass over every configured source. Outcomes
    /// are classified per source; success persists the raw body.
    async fn fetch_all(&self, keyword: &str) {
        let encoded = urlencoding::encode(keyword);

        for (id, site) in self.sites.iter() {
            let url = build_search_url(&site.api, &encoded);
            debug!(source = id, name = %site.name, "Querying source");

            match self.transport.fetch(&url).await {
                Ok(response) => {
                    debug!(source = id, bytes = response.body.len(), "Fetch succeeded");
                    self.persist(id, &response.body);
                }
                Err(e) => {
                    warn!(source = id, url = %url, error = %e, "Source fetch failed, skipping");
                }
            }
        }
    }

    /// Write one raw response verbatim to `<sanitized id>.json`.
    /// A write failure loses that source for this search, nothing more.
    fn persist(&self, source_id: &str, body: &str) {
        let filename = format!("{}.{}", sanitize_source_id(source_id), CACHE_EXT);
        let path = self.cache_dir.join(&filename);

        match std::fs::write(&path, body) {
            Ok(()) => info!(source = source_id, file = %filename, "Response cached"),
            Err(e) => warn!(source = source_id, file = %filename, error = %e, "Failed to cache response"),
        }
    }

    /// Decode every cached file and fold the records into a fresh
    /// merged catalog. Disk is the source of truth: this is also the
    /// startup path, picking up whatever files a previous run left.
    pub fn load_merged(&self) -> Result<MergedCatalog, AggregateError> {
        let entries = std::fs::read_dir(&self.cache_dir)
            .map_err(|e| AggregateError::MergeScan(format!("{}: {}", self.cache_dir.display(), e)))?;

        let mut merged = MergedCatalog::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !is_cache_file(&path) {
                continue;
            }

            match SourceCatalog::from_file(&path) {
                Ok(catalog) => {
                    debug!(file = %path.display(), records = catalog.len(), "Source file decoded");
                    merged.extend(catalog);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping undecodable cache file");
                }
            }
        }

        info!(
            titles = merged.title_count(),
            records = merged.total_records(),
            "Merged catalog rebuilt"
        );
        Ok(merged)
    }
}

fn is_cache_file(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(CACHE_EXT)
}

/// Build a source's videolist search URL from its API template and an
/// already percent-encoded keyword.
fn build_search_url(api: &str, encoded_keyword: &str) -> String {
    format!("{}?ac=videolist&wd={}", api, encoded_keyword)
}

/// Make a source identifier filesystem-safe: every non-alphanumeric
/// character (notably the `.` in domains) becomes `_`.
pub fn sanitize_source_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
