//! Row and record types flowing through the export pipeline.
//!
//! A [`SourceRow`] is one line of the order spreadsheet. Its composite cells
//! hold several order lines joined with `|`; the normalizer turns each row
//! into [`ExplodedLine`]s, the assigner into [`AssignedRecord`]s, and the
//! emitter into one [`OutputFile`] per order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::state::OrderState;

/// Columns read from the source table. Every one of them is composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceColumn {
    Reference,
    Quantity,
    UnitSalePrice,
    PurchasePrice,
    ArticleCode,
    Label,
}

impl SourceColumn {
    pub const ALL: [SourceColumn; 6] = [
        SourceColumn::Reference,
        SourceColumn::Quantity,
        SourceColumn::UnitSalePrice,
        SourceColumn::PurchasePrice,
        SourceColumn::ArticleCode,
        SourceColumn::Label,
    ];

    /// Header name in the spreadsheet export.
    pub fn header(&self) -> &'static str {
        match self {
            SourceColumn::Reference => "Reference",
            SourceColumn::Quantity => "Quantité",
            SourceColumn::UnitSalePrice => "prixUnitHt",
            SourceColumn::PurchasePrice => "prixAchatHt",
            SourceColumn::ArticleCode => "Code Mistral",
            SourceColumn::Label => "Libellé",
        }
    }
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One row of the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    /// 0-based position in the source table.
    pub index: usize,
    pub values: BTreeMap<SourceColumn, String>,
}

impl SourceRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, column: SourceColumn, value: impl Into<String>) -> Self {
        self.values.insert(column, value.into());
        self
    }

    /// Raw cell value, `""` when the column was absent.
    pub fn value(&self, column: SourceColumn) -> &str {
        self.values.get(&column).map(String::as_str).unwrap_or("")
    }
}

/// One order line of a source row that survived the article-code filter.
///
/// Prices are already formatted (`123,45`); quantity is the trimmed raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplodedLine {
    pub source_index: usize,
    /// Position among the row's composite sub-values.
    pub sub_index: usize,
    pub transaction_ref: String,
    pub article_code: String,
    pub label: String,
    pub quantity: String,
    pub unit_sale_price: String,
    pub purchase_price: String,
}

/// One output row: an exploded line with its state, carrier and numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRecord {
    pub transaction_ref: String,
    pub line_number: u32,
    pub order_number: u64,
    pub state: OrderState,
    /// Carrier tracking code when `state` is in delivery, empty otherwise.
    pub tracking_number: String,
    pub carrier_id: String,
    pub article_code: String,
    pub label: String,
    pub quantity: String,
    pub unit_sale_price: String,
    pub purchase_price: String,
}

impl AssignedRecord {
    /// Cells in [`EXPORT_HEADER`] order.
    pub fn cells(&self) -> [String; 11] {
        [
            self.transaction_ref.clone(),
            self.line_number.to_string(),
            self.order_number.to_string(),
            self.state.as_str().to_string(),
            self.tracking_number.clone(),
            self.carrier_id.clone(),
            self.article_code.clone(),
            self.label.clone(),
            self.quantity.clone(),
            self.unit_sale_price.clone(),
            self.purchase_price.clone(),
        ]
    }
}

/// All records of one source row, sharing an order number and carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOrder {
    pub source_index: usize,
    pub order_number: u64,
    pub carrier_id: String,
    pub records: Vec<AssignedRecord>,
}

impl ExportOrder {
    /// Transaction reference of the first record, if any.
    pub fn first_reference(&self) -> Option<&str> {
        self.records
            .first()
            .map(|record| record.transaction_ref.as_str())
            .filter(|reference| !reference.trim().is_empty())
    }

    pub fn has_delivery(&self) -> bool {
        self.records.iter().any(|record| record.state.is_in_delivery())
    }
}

/// Header row of every order export file.
pub const EXPORT_HEADER: [&str; 11] = [
    "No Transaction",
    "No Ligne",
    "No Commande Client",
    "Etat",
    "No Tracking",
    "No Transporteur",
    "Code article",
    "Désignation",
    "Quantité",
    "PV net",
    "PA net",
];

/// A named blob handed to a file sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}
