//! Export of fetched papers.
//!
//! Papers are classified and flattened into [`ExportRow`]s, then either
//! written to a CSV file or printed as a table. Notices for the user go to the
//! writer passed in (stdout in the binary), so the caller decides where they
//! end up.

mod csv_writer;
mod table;

pub use csv_writer::write_csv;
pub use table::render_table;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::{ExportRow, Paper};

/// Notice emitted when there is nothing to export
pub const NOTHING_TO_SAVE: &str = "No papers to save.";

/// What an export did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No papers were given; nothing was written
    NothingToSave,

    /// The table was printed to the console
    Printed { rows: usize },

    /// The CSV file was written
    Saved { path: PathBuf, rows: usize },

    /// Writing the CSV file failed; the failure was reported
    Failed { path: PathBuf, reason: String },
}

/// Classify each paper's authors and flatten the papers into rows
pub fn build_rows(papers: &[Paper]) -> Vec<ExportRow> {
    papers.iter().map(ExportRow::from_paper).collect()
}

/// Export papers to `destination` as CSV, or print them when no destination
/// is given.
///
/// A CSV write failure is reported on `out` and returned as
/// [`ExportOutcome::Failed`]; only failures to write to `out` itself are
/// returned as errors.
pub fn export<W: Write>(
    papers: &[Paper],
    destination: Option<&Path>,
    out: &mut W,
) -> io::Result<ExportOutcome> {
    if papers.is_empty() {
        writeln!(out, "{}", NOTHING_TO_SAVE)?;
        return Ok(ExportOutcome::NothingToSave);
    }

    let rows = build_rows(papers);

    let Some(path) = destination else {
        writeln!(out, "{}", render_table(&rows))?;
        return Ok(ExportOutcome::Printed { rows: rows.len() });
    };

    match write_csv(path, &rows) {
        Ok(()) => {
            tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
            writeln!(out, "Results saved to {}", path.display())?;
            Ok(ExportOutcome::Saved {
                path: path.to_path_buf(),
                rows: rows.len(),
            })
        }
        Err(e) => {
            tracing::error!("Error saving CSV to {}: {}", path.display(), e);
            writeln!(out, "Error saving CSV: {}", e)?;
            Ok(ExportOutcome::Failed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }
}
