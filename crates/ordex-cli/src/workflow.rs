//! End-to-end runs: read, transform, emit, deliver.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use ordex_ingest::{IngestOptions, read_source_table};
use ordex_model::{ExportOrder, OutputFile};
use ordex_output::{
    DeliveryError, FileSink, InvoiceRequest, LocalDirSink, MemorySink, build_invoice_files,
    deliver_batch, emit_batch,
};
use ordex_transform::ExportPipeline;

use crate::config::{DeliveryConfig, ResolvedConfig};
use crate::logging::redact_value;

#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    pub order_number: u64,
    pub carrier: String,
    pub records: usize,
    /// Distinct states of the file, in first-seen order.
    pub states: Vec<String>,
}

impl OrderSummary {
    fn from_order(order: &ExportOrder) -> Self {
        let mut seen = BTreeSet::new();
        let states = order
            .records
            .iter()
            .filter(|record| seen.insert(record.state))
            .map(|record| record.state.to_string())
            .collect();
        Self {
            order_number: order.order_number,
            carrier: order.carrier_id.clone(),
            records: order.records.len(),
            states,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub name: String,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderSummary>,
}

impl FileSummary {
    fn plain(file: &OutputFile) -> Self {
        Self {
            name: file.name.clone(),
            bytes: file.bytes.len(),
            order: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DeliveryStatus {
    Delivered {
        message: String,
    },
    Failed {
        /// Sink message, verbatim.
        message: String,
        saved_to: Option<PathBuf>,
    },
}

impl DeliveryStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileSummary>,
    pub skipped_rows: Vec<usize>,
    pub missing_columns: Vec<String>,
    pub delivery: DeliveryStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceOutcome {
    pub destination: PathBuf,
    pub dry_run: bool,
    pub files: Vec<FileSummary>,
    pub delivery: DeliveryStatus,
}

/// Sends `files` to the drop, or keeps them in memory on a dry run. A
/// failed delivery is saved to the fallback directory when one is set.
pub fn deliver(
    delivery: &DeliveryConfig,
    files: Vec<OutputFile>,
    dry_run: bool,
) -> Result<DeliveryStatus> {
    let mut local;
    let mut memory;
    let sink: &mut dyn FileSink = if dry_run {
        memory = MemorySink::new();
        &mut memory
    } else {
        local = LocalDirSink::new(&delivery.drop.root);
        &mut local
    };

    match deliver_batch(sink, &delivery.drop.dir, files) {
        Ok(report) => Ok(DeliveryStatus::Delivered {
            message: report.message,
        }),
        Err(DeliveryError { message, files, .. }) => {
            error!(%message, "delivery failed");
            let saved_to = match &delivery.fallback_dir {
                Some(dir) => {
                    LocalDirSink::new(dir)
                        .deliver("", &files)
                        .with_context(|| format!("save files to {}", dir.display()))?;
                    warn!(dir = %dir.display(), files = files.len(), "files saved locally");
                    Some(dir.clone())
                }
                None => None,
            };
            Ok(DeliveryStatus::Failed { message, saved_to })
        }
    }
}

/// Runs the whole export for one source table.
pub fn run_export(
    config: &ResolvedConfig,
    source: &Path,
    dry_run: bool,
    generated_at: NaiveDateTime,
) -> Result<ExportOutcome> {
    let span = info_span!("run", source = %source.display(), dry_run);
    let _guard = span.enter();

    let ingest = IngestOptions::default().with_delimiter(config.source_delimiter);
    let table = read_source_table(source, &ingest)
        .with_context(|| format!("read source table {}", source.display()))?;
    info!(rows = table.rows.len(), "source table loaded");

    let mut pipeline = ExportPipeline::new(config.options.clone())?;
    let run = pipeline.run(&table.rows);

    let files = emit_batch(&run.orders, generated_at).context("render export files")?;
    let summaries: Vec<FileSummary> = run
        .orders
        .iter()
        .filter(|order| !order.records.is_empty())
        .zip(&files)
        .map(|(order, file)| {
            debug!(
                file = redact_value(&file.name),
                records = order.records.len(),
                "file ready"
            );
            FileSummary {
                name: file.name.clone(),
                bytes: file.bytes.len(),
                order: Some(OrderSummary::from_order(order)),
            }
        })
        .collect();

    let delivery = deliver(&config.delivery, files, dry_run)?;

    Ok(ExportOutcome {
        source: source.to_path_buf(),
        destination: config.delivery.drop.path(),
        dry_run,
        files: summaries,
        skipped_rows: run.skipped_rows,
        missing_columns: table
            .missing_columns
            .iter()
            .map(ToString::to_string)
            .collect(),
        delivery,
    })
}

/// Builds and delivers the invoice pair.
pub fn run_invoice(
    delivery: &DeliveryConfig,
    request: &InvoiceRequest,
    dry_run: bool,
) -> Result<InvoiceOutcome> {
    let files = build_invoice_files(request)?.into_vec();
    let summaries = files.iter().map(FileSummary::plain).collect();
    info!(files = files.len(), dry_run, "invoice files ready");
    let status = deliver(delivery, files, dry_run)?;
    Ok(InvoiceOutcome {
        destination: delivery.drop.path(),
        dry_run,
        files: summaries,
        delivery: status,
    })
}
