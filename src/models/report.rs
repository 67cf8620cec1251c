use super::{ConversionRate, PricedProduct};

/// Title of the synthetic summary row appended after the products.
pub const TRAILER_TITLE: &str = "AVERAGE PRICE";

/// Priced products in page order plus the averaging trailer row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    products: Vec<PricedProduct>,
    trailer: PricedProduct,
    skipped: usize,
    rate: ConversionRate,
}

impl ReportTable {
    pub(crate) fn new(
        products: Vec<PricedProduct>,
        trailer: PricedProduct,
        skipped: usize,
        rate: ConversionRate,
    ) -> Self {
        Self {
            products,
            trailer,
            skipped,
            rate,
        }
    }

    /// Body rows, trailer excluded.
    pub fn products(&self) -> &[PricedProduct] {
        &self.products
    }

    pub fn trailer(&self) -> &PricedProduct {
        &self.trailer
    }

    /// All rows in export order: products first, trailer last.
    pub fn rows(&self) -> impl Iterator<Item = &PricedProduct> {
        self.products.iter().chain(std::iter::once(&self.trailer))
    }

    /// Cards dropped because of a missing title or an unparseable price.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Rate resolved for this run. Reported alongside the table; the
    /// secondary prices use the fixed divisor.
    pub fn rate(&self) -> ConversionRate {
        self.rate
    }
}
