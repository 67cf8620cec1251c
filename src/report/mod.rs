mod aggregate;
mod chart;
mod export;

pub use aggregate::ReportAggregator;
pub use chart::render_bar_chart;
pub use export::{load_report, read_report, report_header, save_report, write_report};
