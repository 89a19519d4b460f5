mod types;
pub use types::Scraper;
pub use types::ScraperFactory;

mod guard;
pub use guard::ScraperGuard;

mod coinmarketcap;
pub use coinmarketcap::CoinMarketCapCfg;
pub use coinmarketcap::CoinMarketCapFactory;
pub use coinmarketcap::CoinMarketCapScraper;
