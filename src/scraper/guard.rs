use log::{debug, warn};

use crate::error::Result;

use super::{Scraper, ScraperFactory};

/// Owns a scraper for the length of one batch.
///
/// `release` closes the scraper. A guard dropped without being released
/// (cancelled future) drops the scraper it owns.
pub struct ScraperGuard {
    scraper: Box<dyn Scraper>,
    released: bool,
}

impl ScraperGuard {
    pub async fn acquire(factory: &dyn ScraperFactory) -> Result<Self> {
        let scraper = factory.create().await?;
        debug!("scraper acquired");
        Ok(Self {
            scraper,
            released: false,
        })
    }

    pub fn scraper(&mut self) -> &mut dyn Scraper {
        self.scraper.as_mut()
    }

    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        let ret = self.scraper.close().await;
        debug!("scraper released");
        ret
    }
}

impl Drop for ScraperGuard {
    fn drop(&mut self) {
        if !self.released {
            warn!("scraper dropped without close, releasing on drop");
        }
    }
}
