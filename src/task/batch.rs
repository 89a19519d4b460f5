use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use log::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::record::{Coin, CoinRecord};
use crate::scraper::{Scraper, ScraperFactory, ScraperGuard};

use super::Task;

pub const SCRAPE_COIN_DATA: &str = "scrape_coin_data";

/// Fetches a batch of coins through one scraper, in input order.
///
/// The whole batch fails on the first failing coin and no partial records are
/// returned. The scraper is closed on success, on failure and when a fetch
/// panics; the panic is resumed after the close.
pub struct ScrapeCoinData {
    factory: Arc<dyn ScraperFactory>,
}

impl ScrapeCoinData {
    pub fn new(factory: Arc<dyn ScraperFactory>) -> Self {
        Self { factory }
    }

    pub async fn execute(&self, coins: &[Coin]) -> Result<Vec<CoinRecord>> {
        info!("scraping {} coin(s)", coins.len());

        let mut guard = ScraperGuard::acquire(self.factory.as_ref()).await?;
        let ret = AssertUnwindSafe(Self::fetch_all(guard.scraper(), coins))
            .catch_unwind()
            .await;
        if let Err(e) = guard.release().await {
            warn!("failed to close scraper: {}", e);
        }

        let records = match ret {
            Ok(records) => records?,
            Err(payload) => panic::resume_unwind(payload),
        };
        info!("scraped {} coin(s)", records.len());
        Ok(records)
    }

    async fn fetch_all(scraper: &mut dyn Scraper, coins: &[Coin]) -> Result<Vec<CoinRecord>> {
        let mut records = Vec::with_capacity(coins.len());

        for (i, coin) in coins.iter().enumerate() {
            debug!("fetching {} ({}/{})", coin, i + 1, coins.len());
            let output = scraper.get_coin_data(coin).await.map_err(|e| {
                error!("fetching {} failed, aborting batch: {}", coin, e);
                e
            })?;
            records.push(CoinRecord::new(coin.clone(), output));
        }

        Ok(records)
    }
}

#[async_trait]
impl Task for ScrapeCoinData {
    fn name(&self) -> &str {
        SCRAPE_COIN_DATA
    }

    async fn run(&self, args: serde_json::Value) -> Result<serde_json::Value> {
        let coins: Vec<Coin> = serde_json::from_value(args).map_err(|e| {
            Error::TaskError(format!(
                "{}: expects a list of coin identifiers: {}",
                SCRAPE_COIN_DATA, e
            ))
        })?;

        let records = self.execute(&coins).await?;
        Ok(serde_json::to_value(records)?)
    }
}
