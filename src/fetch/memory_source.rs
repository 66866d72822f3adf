use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::error::{ScatterError, ScatterResult};
use crate::fetch::DataSource;

/// In-memory data source used by tests and embedded datasets.
///
/// Every call is recorded so callers can assert on network traffic.
#[derive(Debug, Default)]
pub struct MemorySource {
    resources: RwLock<HashMap<String, ScatterResult<Vec<u8>>>>,
    requests: Mutex<Vec<String>>,
    latency: Option<Duration>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resource(self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Makes `url` fail with the given HTTP status.
    #[must_use]
    pub fn with_failure(self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        let failure = ScatterError::Fetch {
            resource: url.clone(),
            cause: format!("HTTP {status}"),
        };
        self.resources.write().insert(url, Err(failure));
        self
    }

    /// Delays every response, keeping requests in flight long enough to overlap.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.resources.write().insert(url.into(), Ok(body.into()));
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    #[must_use]
    pub fn requests_for(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|seen| *seen == url).count()
    }

    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_bytes(&self, url: &str) -> ScatterResult<Vec<u8>> {
        self.requests.lock().push(url.to_owned());
        trace!(url, "memory source request");
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.resources
            .read()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(ScatterError::Fetch {
                    resource: url.to_owned(),
                    cause: "HTTP 404".to_owned(),
                })
            })
    }
}
