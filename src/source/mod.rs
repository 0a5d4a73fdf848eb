//! Metric Data Sources
//!
//! Where chart payloads come from. The loader only sees the
//! [`DataSource`] trait; [`HttpDataSource`] talks to the Healthsome backend.

mod error;
mod http;

pub use error::FetchError;
pub use http::{HttpDataSource, SourceConfig};

use async_trait::async_trait;
use serde_json::Value;

/// Source of chart payloads
#[async_trait]
pub trait DataSource: Send + Sync {
    /// GET `path_and_query` (e.g. `/weight/data?range=last_week`) and
    /// return the decoded JSON body.
    async fn fetch(&self, path_and_query: &str) -> Result<Value, FetchError>;
}
