use async_trait::async_trait;
use tracing::debug;

use crate::error::{ScatterError, ScatterResult};
use crate::fetch::DataSource;

/// `GET`-based source backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_bytes(&self, url: &str) -> ScatterResult<Vec<u8>> {
        let fetch_error = |cause: String| ScatterError::Fetch {
            resource: url.to_owned(),
            cause,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "fetched resource");
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(body.to_vec())
    }
}
