//! Key-value persistence abstraction

use anyhow::Result;
use async_trait::async_trait;

/// Key under which the selected display currency is stored.
pub const SELECTED_CURRENCY_KEY: &str = "selected_currency";

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}
