//! Catalog decoding and query types.
//!
//! `record` decodes one raw source-API object, `source` holds one
//! source's decoded response, `merged` is the cross-source catalog
//! served to the presentation layer.

mod merged;
mod record;
mod source;

pub use merged::MergedCatalog;
pub use record::{
    decode_episodes, decode_play_tracks, decode_record, Episode, VideoRecord, EPISODE_DELIMITER,
    LABEL_URL_DELIMITER, PLAY_SOURCE_DELIMITER,
};
pub use source::SourceCatalog;

use thiserror::Error;

/// Errors from parsing one source response file or string.
///
/// "File not found" is distinct from other I/O and from malformed
/// JSON so callers can report accurately; a single bad file degrades
/// coverage, it never aborts a merge.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Source file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read source file: {0}")]
    Io(String),

    #[error("Malformed source JSON: {0}")]
    MalformedJson(String),
}
