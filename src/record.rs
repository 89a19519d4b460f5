use serde::{Deserialize, Serialize};

/// Opaque token naming one coin to fetch, e.g. a ticker symbol.
pub type Coin = String;

/// One fetched coin, paired with whatever the scraper returned for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub coin: Coin,
    pub output: serde_json::Value,
}

impl CoinRecord {
    pub fn new(coin: Coin, output: serde_json::Value) -> Self {
        Self { coin, output }
    }
}
