//! Decoding of raw source-API video objects.
//!
//! Source APIs pack play sources and episodes into two parallel
//! delimited strings (`vod_play_from` / `vod_play_url`). Everything in
//! here ingests uncontrolled third-party data, so decoding degrades to
//! partial output instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Separates play-source segments in `vod_play_from` / `vod_play_url`.
pub const PLAY_SOURCE_DELIMITER: &str = "$$$";
/// Separates episode chunks within one play-source segment.
pub const EPISODE_DELIMITER: char = '#';
/// Separates an episode label from its URL (first occurrence only).
pub const LABEL_URL_DELIMITER: char = '$';

/// One playable unit within a play-source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub label: String,
    pub url: String,
}

impl Episode {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// A normalized catalog entry from one source API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Identifier unique within a single source's result set only.
    pub id: i64,
    /// Which source file/API produced this record.
    pub source_tag: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub remarks: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cover_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Play-source label -> ordered episode list. Episode order is
    /// significant; key order is not.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub play_tracks: BTreeMap<String, Vec<Episode>>,
}

/// Decode one raw source-API video object into a [`VideoRecord`].
///
/// Missing or mistyped fields yield the zero value; this never fails.
pub fn decode_record(raw: &Value, source_tag: &str) -> VideoRecord {
    let play_from = str_field(raw, "vod_play_from");
    let play_url = str_field(raw, "vod_play_url");

    VideoRecord {
        id: raw.get("vod_id").and_then(Value::as_i64).unwrap_or(0),
        source_tag: source_tag.to_string(),
        title: str_field(raw, "vod_name"),
        subtitle: str_field(raw, "vod_sub"),
        remarks: str_field(raw, "vod_remarks"),
        cover_url: str_field(raw, "vod_pic"),
        description: str_field(raw, "vod_content"),
        category: raw
            .get("type_name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        play_tracks: decode_play_tracks(&play_from, &play_url),
    }
}

/// Decode the parallel `vod_play_from` / `vod_play_url` strings.
///
/// On a segment-count mismatch only the overlapping prefix is
/// processed; a mismatch is an upstream data defect, not a fault here.
/// A later duplicate play-source label overwrites an earlier one.
pub fn decode_play_tracks(play_from: &str, play_url: &str) -> BTreeMap<String, Vec<Episode>> {
    let mut tracks = BTreeMap::new();
    if play_from.is_empty() || play_url.is_empty() {
        return tracks;
    }

    for (label, segment) in play_from
        .split(PLAY_SOURCE_DELIMITER)
        .zip(play_url.split(PLAY_SOURCE_DELIMITER))
    {
        tracks.insert(label.to_string(), decode_episodes(segment));
    }

    tracks
}

/// Decode one play-source segment into its ordered episode list.
///
/// Chunks without a `$` carry no URL and are discarded.
pub fn decode_episodes(segment: &str) -> Vec<Episode> {
    segment
        .split(EPISODE_DELIMITER)
        .filter_map(|chunk| {
            chunk
                .split_once(LABEL_URL_DELIMITER)
                .map(|(label, url)| Episode::new(label, url))
        })
        .collect()
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
