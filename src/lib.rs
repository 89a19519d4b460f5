pub mod error;
pub use error::*;

pub mod record;
pub mod scraper;
pub mod task;

mod wrapper;
