use tracing::{debug, warn};

use crate::error::ReportError;
use crate::models::{ConversionRate, PricedProduct, RawProduct, ReportTable, TRAILER_TITLE};
use crate::parsers::normalize_price;

/// Turns raw cards into priced rows and appends the averaging trailer.
///
/// Secondary prices are `primary / fixed_divisor`, rounded to cents. The
/// resolved conversion rate travels with the table but does not enter the
/// arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct ReportAggregator {
    fixed_divisor: f64,
}

impl ReportAggregator {
    pub fn new(fixed_divisor: f64) -> Self {
        Self { fixed_divisor }
    }

    pub fn aggregate(
        &self,
        raw_products: &[RawProduct],
        rate: ConversionRate,
    ) -> Result<ReportTable, ReportError> {
        let mut products = Vec::with_capacity(raw_products.len());
        let mut sum_primary = 0.0;
        let mut sum_secondary = 0.0;

        for (index, raw) in raw_products.iter().enumerate() {
            match self.price(raw) {
                Ok(product) => {
                    sum_primary += product.price_primary;
                    sum_secondary += product.price_secondary;
                    products.push(product);
                }
                Err(reason) => debug!("Skipping product card #{}: {}", index + 1, reason),
            }
        }

        if products.is_empty() {
            return Err(ReportError::EmptyDataset);
        }

        let skipped = raw_products.len() - products.len();
        if skipped > 0 {
            warn!("Skipped {} of {} product cards", skipped, raw_products.len());
        }

        let count = products.len() as f64;
        let trailer = PricedProduct {
            title: TRAILER_TITLE.to_string(),
            price_primary: round_cents(sum_primary / count),
            price_secondary: round_cents(sum_secondary / count),
            image_url: String::new(),
        };

        Ok(ReportTable::new(products, trailer, skipped, rate))
    }

    fn price(&self, raw: &RawProduct) -> Result<PricedProduct, String> {
        let title = raw.title.as_deref().ok_or("missing title")?;
        let price_text = raw.price_text.as_deref().ok_or("missing price")?;
        let price_primary = normalize_price(price_text).map_err(|e| e.to_string())?;

        Ok(PricedProduct {
            title: title.to_string(),
            price_primary,
            price_secondary: round_cents(price_primary / self.fixed_divisor),
            image_url: raw.image_url.clone().unwrap_or_default(),
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
