//! Order spreadsheet ingestion.
//!
//! Loads the denormalized order export (one row per order, `|`-joined order
//! lines) into [`ordex_model::SourceRow`]s. Columns are located by header
//! name; absent columns and null cells read as empty text.

mod error;
mod reader;
mod rows;

pub use error::{IngestError, Result};
pub use reader::{IngestOptions, read_source_frame};
pub use rows::{
    SourceTable, find_column, normalize_header, read_source_table, source_rows_from_frame,
};
