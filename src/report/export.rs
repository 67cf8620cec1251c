use std::fs;
use std::io;
use std::path::Path;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::models::{PricedProduct, ReportTable};

/// Header of the exported table, e.g. `title,price_MAD,price_USD,image`.
pub fn report_header(config: &ReportConfig) -> [String; 4] {
    [
        "title".to_string(),
        format!("price_{}", config.primary_currency),
        format!("price_{}", config.secondary_currency),
        "image".to_string(),
    ]
}

pub fn write_report<W: io::Write>(
    table: &ReportTable,
    config: &ReportConfig,
    writer: W,
) -> Result<(), ReportError> {
    // Header names depend on the configured currencies, so rows are
    // serialized positionally under a hand-written header.
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(report_header(config))?;

    for row in table.rows() {
        csv.serialize(row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Read an exported table back, trailer included as the last row.
pub fn read_report<R: io::Read>(reader: R) -> Result<Vec<PricedProduct>, ReportError> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for record in csv.records() {
        let row: PricedProduct = record?.deserialize(None)?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write the report to `path`. The table is rendered in memory and moved into
/// place with a rename, so an existing file is never left half-written.
pub fn save_report(table: &ReportTable, config: &ReportConfig, path: &Path) -> Result<(), ReportError> {
    let mut buffer = Vec::new();
    write_report(table, config, &mut buffer)?;

    let tmp_path = path.with_extension("csv.tmp");
    let result = fs::write(&tmp_path, &buffer).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }

    result.map_err(ReportError::from)
}

pub fn load_report(path: &Path) -> Result<Vec<PricedProduct>, ReportError> {
    read_report(fs::File::open(path)?)
}
