//! Console table output.

use comfy_table::{Attribute, Cell, Row, Table};

use crate::models::{ExportRow, EXPORT_COLUMNS};

/// Build a console table with the export columns.
pub fn render_table(rows: &[ExportRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(EXPORT_COLUMNS.to_vec());

    for row in rows {
        let [id, title, date, non_academic, companies, email] = row.cells();
        table.add_row(Row::from(vec![
            Cell::new(id),
            Cell::new(title).add_attribute(Attribute::Bold),
            Cell::new(date),
            Cell::new(non_academic),
            Cell::new(companies),
            Cell::new(email),
        ]));
    }

    table
}
