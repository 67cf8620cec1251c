use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::config::{Config, ListingConfig};
use crate::error::ScrapeError;
use crate::models::RawProduct;
use crate::parsers::clean_text;
use crate::scrapers::ListingScraper;
use crate::utils::http::{header_map, require_status_ok, ResilientFetcher, Target};

pub struct JumiaScraper {
    config: Arc<Config>,
}

impl JumiaScraper {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ListingScraper for JumiaScraper {
    async fn scrape(&self, fetcher: &ResilientFetcher) -> Result<Vec<RawProduct>, ScrapeError> {
        let listing = &self.config.listing;
        info!("Scraping listing page {}", listing.url);

        let target = Target::new(listing.url.clone()).with_headers(header_map(&listing.headers));
        let response = fetcher
            .fetch(&target, &listing.fetch, require_status_ok)
            .await?;

        let products = extract_products(&response.body, listing)?;
        info!("Found {} product cards on listing page", products.len());

        Ok(products)
    }

    fn listing_url(&self) -> &str {
        &self.config.listing.url
    }
}

struct CardSelectors {
    card: Selector,
    title: Selector,
    price: Selector,
    image: Selector,
}

impl CardSelectors {
    fn parse(config: &ListingConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            card: parse_selector(&config.card_selector)?,
            title: parse_selector(&config.title_selector)?,
            price: parse_selector(&config.price_selector)?,
            image: parse_selector(&config.image_selector)?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|_| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
    })
}

/// Parse a listing page into raw product records, one per matched card.
///
/// Cards are matched on their exact `class` attribute. A card missing its
/// title, price or image sub-element yields a record with that field unset.
pub fn extract_products(html: &str, config: &ListingConfig) -> Result<Vec<RawProduct>, ScrapeError> {
    let selectors = CardSelectors::parse(config)?;
    let base = Url::parse(&config.url).ok();
    let document = Html::parse_document(html);

    let products = document
        .select(&selectors.card)
        .map(|card| RawProduct {
            title: first_text(card, &selectors.title),
            price_text: first_text(card, &selectors.price),
            image_url: card
                .select(&selectors.image)
                .next()
                .and_then(|img| image_source(img, &config.image_attributes))
                .map(|src| resolve_url(base.as_ref(), src)),
        })
        .collect();

    Ok(products)
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|element| clean_text(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

fn image_source<'a>(img: ElementRef<'a>, attributes: &[String]) -> Option<&'a str> {
    attributes
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .map(str::trim)
        .find(|src| !src.is_empty())
}

fn resolve_url(base: Option<&Url>, src: &str) -> String {
    base.and_then(|base| base.join(src).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| src.to_string())
}
