use async_trait::async_trait;

use crate::error::ScrapeError;
use crate::models::RawProduct;
use crate::utils::http::ResilientFetcher;

mod jumia;

pub use jumia::{extract_products, JumiaScraper};

#[async_trait]
pub trait ListingScraper: Send + Sync {
    /// Fetch the listing page and return one record per product card.
    /// A page that cannot be fetched is an error; incomplete cards are not.
    async fn scrape(&self, fetcher: &ResilientFetcher) -> Result<Vec<RawProduct>, ScrapeError>;
    fn listing_url(&self) -> &str;
}
