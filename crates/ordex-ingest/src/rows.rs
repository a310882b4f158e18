//! Conversion of the source DataFrame into [`SourceRow`]s.

use std::path::Path;

use polars::prelude::*;
use tracing::warn;

use ordex_model::{SourceColumn, SourceRow};

use crate::error::Result;
use crate::reader::{IngestOptions, read_source_frame};

/// Rows of the source table plus what could not be found in it.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    pub rows: Vec<SourceRow>,
    /// Expected columns absent from the header; their cells read as empty.
    pub missing_columns: Vec<SourceColumn>,
}

/// Normalizes a header cell: strips a BOM, trims and collapses inner spaces.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Finds the frame column holding `column`, ignoring case and spacing.
pub fn find_column<'a>(df: &'a DataFrame, column: SourceColumn) -> Option<&'a Column> {
    let wanted = column.header().to_lowercase();
    df.get_columns()
        .iter()
        .find(|candidate| normalize_header(candidate.name().as_str()).to_lowercase() == wanted)
}

/// Builds one [`SourceRow`] per frame row, in frame order.
pub fn source_rows_from_frame(df: &DataFrame) -> Result<SourceTable> {
    let mut table = SourceTable {
        rows: (0..df.height()).map(SourceRow::new).collect(),
        missing_columns: Vec::new(),
    };
    for column in SourceColumn::ALL {
        let Some(series) = find_column(df, column) else {
            warn!(column = %column, "source column missing, values read as empty");
            table.missing_columns.push(column);
            continue;
        };
        let text = series.cast(&DataType::String)?;
        let values = text.str()?;
        for (idx, row) in table.rows.iter_mut().enumerate() {
            let value = values.get(idx).unwrap_or("");
            row.values.insert(column, value.to_string());
        }
    }
    Ok(table)
}

/// Reads and converts a source CSV file in one step.
pub fn read_source_table(path: &Path, options: &IngestOptions) -> Result<SourceTable> {
    let df = read_source_frame(path, options)?;
    source_rows_from_frame(&df)
}
