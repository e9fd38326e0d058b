//! Transport abstraction for fetching rate documents

use anyhow::Result;
use async_trait::async_trait;

/// Fetches the raw JSON document carrying a rate table.
///
/// Timeouts and retries belong to the implementation; callers only see the
/// parsed document or an error.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn fetch_json(&self) -> Result<serde_json::Value>;
}
