mod types;
pub use types::Task;

mod registry;
pub use registry::TaskRegistry;

mod batch;
pub use batch::SCRAPE_COIN_DATA;
pub use batch::ScrapeCoinData;
