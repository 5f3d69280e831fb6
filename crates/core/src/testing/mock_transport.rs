//! Mock transport for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{FetchError, FetchResponse, Transport};

/// One configured rule: first URL-substring match wins.
#[derive(Debug, Clone)]
struct Rule {
    pattern: String,
    outcome: Result<FetchResponse, FetchError>,
}

/// Mock implementation of the [`Transport`] trait.
///
/// Rules map a URL substring to a canned response or an injected
/// error; unmatched URLs fail with a connection error. Every fetched
/// URL is recorded for assertions.
#[derive(Debug, Default)]
pub struct MockTransport {
    rules: Arc<RwLock<Vec<Rule>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to URLs containing `pattern` with HTTP 200 and `body`.
    pub async fn respond(&self, pattern: &str, body: &str) {
        self.rules.write().await.push(Rule {
            pattern: pattern.to_string(),
            outcome: Ok(FetchResponse {
                status: 200,
                body: body.to_string(),
            }),
        });
    }

    /// Fail URLs containing `pattern` with the given error.
    pub async fn fail(&self, pattern: &str, error: FetchError) {
        self.rules.write().await.push(Rule {
            pattern: pattern.to_string(),
            outcome: Err(error),
        });
    }

    /// Remove all configured rules.
    pub async fn clear_rules(&self) {
        self.rules.write().await.clear();
    }

    /// Every URL fetched so far, in order.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.write().await.push(url.to_string());

        let rules = self.rules.read().await;
        for rule in rules.iter() {
            if url.contains(&rule.pattern) {
                return rule.outcome.clone();
            }
        }

        Err(FetchError::Connection(format!("no mock rule for {}", url)))
    }
}
