use plotters::prelude::*;
use std::path::Path;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::models::ReportTable;

const CHART_SIZE: (u32, u32) = (1200, 600);

/// Render one bar per product (trailer excluded) with its primary-currency
/// price, as an SVG file.
pub fn render_bar_chart(table: &ReportTable, config: &ReportConfig, path: &Path) -> Result<(), ReportError> {
    draw(table, config, path).map_err(|e| ReportError::Chart(e.to_string()))
}

fn draw(
    table: &ReportTable,
    config: &ReportConfig,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = table.products();
    let max_price = products
        .iter()
        .map(|p| p.price_primary)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.chart_title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(220)
        .y_label_area_size(80)
        .build_cartesian_2d((0..products.len()).into_segmented(), 0.0..max_price * 1.1)?;

    let label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(index) => products
            .get(*index)
            .map(|p| p.title.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Product Name")
        .y_desc(format!("Price ({})", config.primary_currency))
        .x_labels(products.len())
        .x_label_formatter(&label)
        .x_label_style(("sans-serif", 10).into_font().transform(FontTransform::Rotate90))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(4)
            .data(products.iter().enumerate().map(|(i, p)| (i, p.price_primary))),
    )?;

    root.present()?;
    Ok(())
}
