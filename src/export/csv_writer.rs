//! CSV file output.

use std::path::Path;

use crate::models::ExportRow;

/// Write rows as UTF-8 CSV with a header row and no index column.
///
/// Nothing is written to `path` unless every row serializes.
pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<(), csv::Error> {
    let data = render_csv(rows)?;
    std::fs::write(path, data)?;
    Ok(())
}

/// Render rows as CSV bytes, header first
fn render_csv(rows: &[ExportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());

    for row in rows {
        wtr.serialize(row.record())?;
    }

    wtr.into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
