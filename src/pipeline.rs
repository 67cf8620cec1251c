use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::models::ConversionRate;
use crate::report::{render_bar_chart, save_report, ReportAggregator};
use crate::scrapers::{JumiaScraper, ListingScraper};
use crate::utils::exchange_rate::RateResolver;
use crate::utils::http::{create_client, ResilientFetcher};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cards_found: usize,
    pub products_reported: usize,
    pub skipped: usize,
    pub average_primary: f64,
    pub average_secondary: f64,
    pub rate: ConversionRate,
    pub csv_path: PathBuf,
    /// `None` when the chart could not be rendered.
    pub chart_path: Option<PathBuf>,
}

/// Fetch, extract, price and export once, strictly in sequence.
///
/// Fails without touching the report file when the listing page cannot be
/// fetched or no card yields a valid price.
pub async fn run(config: Arc<Config>) -> Result<RunSummary> {
    info!(
        "--- Starting price report at {} ---",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let client = create_client(&config.listing.user_agent)?;
    let fetcher = ResilientFetcher::new(client);

    let scraper = JumiaScraper::new(config.clone());
    let raw_products = scraper.scrape(&fetcher).await.with_context(|| {
        format!(
            "can't continue without the listing page {}",
            scraper.listing_url()
        )
    })?;

    info!("Fetching USD -> {} conversion rate...", config.exchange_rate.target_currency);
    let rate = RateResolver::new(&config.exchange_rate)
        .resolve_rate(&fetcher)
        .await;

    let table = ReportAggregator::new(config.report.fixed_divisor)
        .aggregate(&raw_products, rate)
        .with_context(|| format!("no report produced from {} product cards", raw_products.len()))?;

    let csv_path = config.report.csv_path.clone();
    save_report(&table, &config.report, &csv_path)
        .with_context(|| format!("failed to write report to {}", csv_path.display()))?;
    info!("CSV file saved: {}", csv_path.display());

    info!("Generating bar chart...");
    let chart_path = match render_bar_chart(&table, &config.report, &config.report.chart_path) {
        Ok(()) => {
            info!("Bar chart saved: {}", config.report.chart_path.display());
            Some(config.report.chart_path.clone())
        }
        Err(e) => {
            error!("Failed to render bar chart: {}", e);
            None
        }
    };

    Ok(RunSummary {
        cards_found: raw_products.len(),
        products_reported: table.products().len(),
        skipped: table.skipped(),
        average_primary: table.trailer().price_primary,
        average_secondary: table.trailer().price_secondary,
        rate,
        csv_path,
        chart_path,
    })
}

impl RunSummary {
    pub fn log(&self, config: &Config) {
        info!("-----------------------------------");
        info!("Products report saved to {}", self.csv_path.display());
        info!("Products found: {}", self.cards_found);
        if self.skipped > 0 {
            info!(
                "Products reported: {} ({} skipped)",
                self.products_reported, self.skipped
            );
        }
        info!(
            "Average price in {}: {:.2}",
            config.report.primary_currency, self.average_primary
        );
        info!(
            "Average price in {}: {:.2}",
            config.report.secondary_currency, self.average_secondary
        );
        info!(
            "Conversion rate: 1 USD -> {} {} ({})",
            self.rate.value(),
            config.exchange_rate.target_currency,
            self.rate.source()
        );
        info!("-----------------------------------");
    }
}
