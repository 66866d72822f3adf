//! Remote resource loading.
//!
//! A [`DataSource`] turns a URL into text; the [`FetchCoordinator`] decides
//! which resources are missing, coalesces concurrent requests, and commits
//! parsed columns into the variable store.

mod coordinator;
#[cfg(feature = "http")]
mod http;
mod locator;
mod memory_source;

pub use coordinator::{FetchCoordinator, FetchScope};
#[cfg(feature = "http")]
pub use http::HttpSource;
pub use locator::{PathLayout, Resource, ResourceKind, ResourceLocator};
pub use memory_source::MemorySource;

use async_trait::async_trait;

use crate::error::ScatterResult;

/// Request/response source of raw resource bodies.
///
/// Bodies are returned undecoded so encoding faults surface as
/// [`crate::ScatterError::Parse`]. Implementations report unreachable
/// resources and non-success responses as [`crate::ScatterError::Fetch`].
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> ScatterResult<Vec<u8>>;
}
