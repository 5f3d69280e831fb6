//! Testing utilities and mock implementations.
//!
//! Provides a mock [`crate::transport::Transport`] plus fixture
//! helpers, so the full search pipeline can be tested without real
//! source APIs.
//!
//! # Example
//!
//! ```rust,ignore
//! use vodpool_core::testing::{fixtures, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.respond("api.alpha.com", &fixtures::videolist_response(&[
//!     fixtures::raw_video(1, "Show X", "m1", "e1$1.mp4"),
//! ])).await;
//!
//! // Use in an Aggregator...
//! ```

mod mock_transport;

pub use mock_transport::MockTransport;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    /// Build a raw video object in the source-API wire shape.
    pub fn raw_video(id: i64, name: &str, play_from: &str, play_url: &str) -> Value {
        json!({
            "vod_id": id,
            "vod_name": name,
            "vod_pic": format!("http://img/{}.jpg", id),
            "vod_remarks": "HD",
            "type_name": "Drama",
            "vod_play_from": play_from,
            "vod_play_url": play_url,
        })
    }

    /// Wrap raw video objects into a full videolist response body.
    pub fn videolist_response(videos: &[Value]) -> String {
        json!({ "code": 1, "msg": "ok", "list": videos }).to_string()
    }

    /// A site-list JSON body for the given (id, api) pairs.
    pub fn site_list_json(sites: &[(&str, &str)]) -> String {
        let mut api_site = serde_json::Map::new();
        for (id, api) in sites {
            api_site.insert(
                id.to_string(),
                json!({ "name": id.to_string(), "api": api.to_string() }),
            );
        }
        json!({ "api_site": api_site }).to_string()
    }
}
