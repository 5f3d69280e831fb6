//! Site-list loading.
//!
//! The list of source APIs lives in a JSON file fixed by convention
//! among the upstream catalog sites:
//!
//! ```json
//! { "api_site": { "api.example.com": { "name": "Example", "api": "https://..." } } }
//! ```
//!
//! Loaded once at startup; read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// One configured source API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Site {
    /// Display name.
    pub name: String,
    /// API base URL the search query is appended to.
    pub api: String,
}

/// All configured sources, keyed by source identifier (usually the
/// site's domain).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteList {
    #[serde(default)]
    pub api_site: BTreeMap<String, Site>,
}

impl SiteList {
    pub fn len(&self) -> usize {
        self.api_site.len()
    }

    pub fn is_empty(&self) -> bool {
        self.api_site.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Site)> {
        self.api_site.iter().map(|(id, site)| (id.as_str(), site))
    }
}

/// Errors loading the site list. Any of these is fatal to a search:
/// without sources there is nothing to query.
#[derive(Debug, Error)]
pub enum SitesError {
    #[error("Site list not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read site list: {0}")]
    Io(String),

    #[error("Malformed site list JSON: {0}")]
    MalformedJson(String),

    #[error("Site list contains no sources")]
    Empty,
}

/// Load the site list from a JSON file.
pub fn load_sites(path: &Path) -> Result<SiteList, SitesError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SitesError::FileNotFound(path.display().to_string())
        } else {
            SitesError::Io(e.to_string())
        }
    })?;

    load_sites_from_str(&text)
}

/// Load the site list from raw JSON text (useful for testing)
pub fn load_sites_from_str(text: &str) -> Result<SiteList, SitesError> {
    let sites: SiteList =
        serde_json::from_str(text).map_err(|e| SitesError::MalformedJson(e.to_string()))?;

    if sites.is_empty() {
        return Err(SitesError::Empty);
    }

    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "api_site": {
            "api.alpha.com": { "name": "Alpha", "api": "https://api.alpha.com/provide/vod/" },
            "beta.tv": { "name": "Beta", "api": "https://beta.tv/api.php/provide/vod/" }
        }
    }"#;

    #[test]
    fn test_load_sites_from_str() {
        let sites = load_sites_from_str(SAMPLE).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites.api_site["api.alpha.com"].name, "Alpha");
        assert!(sites.api_site["beta.tv"].api.starts_with("https://beta.tv"));
    }

    #[test]
    fn test_load_sites_malformed_json() {
        let result = load_sites_from_str("{broken");
        assert!(matches!(result, Err(SitesError::MalformedJson(_))));
    }

    #[test]
    fn test_load_sites_missing_api_site_key() {
        let result = load_sites_from_str(r#"{"sites": {}}"#);
        // Unknown shape deserializes to an empty map.
        assert!(matches!(result, Err(SitesError::Empty)));
    }

    #[test]
    fn test_load_sites_empty_fails() {
        let result = load_sites_from_str(r#"{"api_site": {}}"#);
        assert!(matches!(result, Err(SitesError::Empty)));
    }

    #[test]
    fn test_load_sites_file_not_found() {
        let result = load_sites(Path::new("/nonexistent/sources.json"));
        assert!(matches!(result, Err(SitesError::FileNotFound(_))));
    }

    #[test]
    fn test_load_sites_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let sites = load_sites(file.path()).unwrap();
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn test_iter_yields_all_sites() {
        let sites = load_sites_from_str(SAMPLE).unwrap();
        let ids: Vec<_> = sites.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["api.alpha.com", "beta.tv"]);
    }
}
