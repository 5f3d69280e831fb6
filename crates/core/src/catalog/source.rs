//! Repository over a single source API's decoded response.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use super::record::{decode_record, VideoRecord};
use super::CatalogError;

/// The decoded contents of one source API's JSON response.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    source: String,
    records: Vec<VideoRecord>,
}

impl SourceCatalog {
    /// Parse a cached response file. The source tag is the file stem
    /// (cache files are named after the sanitized source id).
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::FileNotFound(path.display().to_string())
            } else {
                CatalogError::Io(e.to_string())
            }
        })?;

        let source = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();

        Self::from_str(&text, source)
    }

    /// Parse raw response text with an explicit source tag.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str, source: &str) -> Result<Self, CatalogError> {
        let doc: Value =
            serde_json::from_str(text).map_err(|e| CatalogError::MalformedJson(e.to_string()))?;

        // A response without a `list` array decodes to an empty
        // catalog; only unparseable JSON is an error.
        let records = doc
            .get("list")
            .and_then(Value::as_array)
            .map(|list| list.iter().map(|raw| decode_record(raw, source)).collect())
            .unwrap_or_default();

        Ok(Self {
            source: source.to_string(),
            records,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// All records in response order.
    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with the given id. Ids are per-source; callers
    /// must not assume cross-source uniqueness.
    pub fn get_by_id(&self, id: i64) -> Option<&VideoRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Case-insensitive substring match against titles. An empty
    /// query matches every record with a non-empty title.
    pub fn search_by_title(&self, query: &str) -> Vec<&VideoRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| !r.title.is_empty() && r.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Record counts grouped by category. Records without a category
    /// are excluded rather than counted under a sentinel key.
    pub fn category_statistics(&self) -> BTreeMap<String, usize> {
        let mut stats = BTreeMap::new();
        for record in &self.records {
            if let Some(category) = &record.category {
                *stats.entry(category.clone()).or_insert(0) += 1;
            }
        }
        stats
    }

    pub fn into_records(self) -> Vec<VideoRecord> {
        self.records
    }
}
