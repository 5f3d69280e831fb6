//! The merged cross-source catalog and its read-only query facade.

use serde::Serialize;
use std::collections::BTreeMap;

use super::record::VideoRecord;
use super::source::SourceCatalog;

/// Records from every source, grouped by title.
///
/// Built wholesale per search and replaced atomically; readers only
/// ever see a complete instance. All queries are linear scans — the
/// catalog is rebuilt per search and small enough that indices would
/// not pay for themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedCatalog {
    by_title: BTreeMap<String, Vec<VideoRecord>>,
}

impl MergedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in under its title.
    pub fn insert(&mut self, record: VideoRecord) {
        self.by_title
            .entry(record.title.clone())
            .or_default()
            .push(record);
    }

    /// Fold every record of a decoded source catalog in.
    pub fn extend(&mut self, catalog: SourceCatalog) {
        for record in catalog.into_records() {
            self.insert(record);
        }
    }

    /// Title -> contributed records, in title order.
    pub fn by_title(&self) -> &BTreeMap<String, Vec<VideoRecord>> {
        &self.by_title
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.by_title.keys().map(String::as_str)
    }

    pub fn title_count(&self) -> usize {
        self.by_title.len()
    }

    pub fn total_records(&self) -> usize {
        self.by_title.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// First record with the given id, scanning in title order. Ids
    /// are per-source, so the match is a best effort, never a default
    /// record.
    pub fn get_by_id(&self, id: i64) -> Option<&VideoRecord> {
        self.by_title
            .values()
            .flat_map(|records| records.iter())
            .find(|r| r.id == id)
    }

    /// Case-insensitive substring match across the merged set, same
    /// rule as the per-source repository.
    pub fn search(&self, query: &str) -> Vec<&VideoRecord> {
        let needle = query.to_lowercase();
        self.by_title
            .values()
            .flat_map(|records| records.iter())
            .filter(|r| !r.title.is_empty() && r.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Category counts aggregated across every source's records.
    pub fn category_statistics(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for record in self.by_title.values().flatten() {
            if let Some(category) = &record.category {
                *stats.entry(category.clone()).or_insert(0) += 1;
            }
        }
        stats
    }
}
