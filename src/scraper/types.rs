use async_trait::async_trait;

use crate::error::Result;

/// A stateful fetcher owned by one task invocation.
///
/// `close` releases whatever the scraper holds. It must be valid after any
/// number of `get_coin_data` calls, including none.
#[async_trait]
pub trait Scraper: Send {
    async fn get_coin_data(&mut self, coin: &str) -> Result<serde_json::Value>;

    async fn close(&mut self) -> Result<()>;
}

/// Builds a fresh scraper for every task invocation.
#[async_trait]
pub trait ScraperFactory: Send + Sync {
    async fn create(&self) -> Result<Box<dyn Scraper>>;
}
