//! Row-by-row export pipeline.
//!
//! Rows are processed strictly in source order: the order-number, cyclic
//! state and carrier counters of [`RunCounters`] depend on every previous
//! row, so the loop is sequential.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, info_span};

use ordex_model::{ConfigError, ExportOptions, ExportOrder, SourceRow};

use crate::assign::{Assigner, RunCounters};
use crate::normalize::explode_row;

/// Orders produced by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRun {
    pub orders: Vec<ExportOrder>,
    /// Source indices of rows that produced no record.
    pub skipped_rows: Vec<usize>,
    /// Counter values after the last processed row.
    pub counters: RunCounters,
}

impl ExportRun {
    pub fn record_count(&self) -> usize {
        self.orders.iter().map(|order| order.records.len()).sum()
    }
}

/// Normalizes and assigns a table of source rows.
#[derive(Debug)]
pub struct ExportPipeline {
    options: ExportOptions,
    rng: StdRng,
}

impl ExportPipeline {
    /// Validates the options; a run never starts on invalid configuration.
    pub fn new(options: ExportOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { options, rng })
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Fresh counters starting at the configured order base.
    pub fn counters(&self) -> RunCounters {
        RunCounters::new(self.options.order_base)
    }

    /// Explodes and assigns a single row.
    ///
    /// Returns `None` when the row has no line with an article code; such a
    /// row consumes no order number and no carrier slot.
    pub fn process_row(
        &mut self,
        row: &SourceRow,
        counters: &mut RunCounters,
    ) -> Option<ExportOrder> {
        let lines = explode_row(row);
        Assigner::from_validated(&self.options).assign_order(
            row.index,
            &lines,
            counters,
            &mut self.rng,
        )
    }

    /// Processes `rows` in order until the table or `max_orders` is exhausted.
    pub fn run(&mut self, rows: &[SourceRow]) -> ExportRun {
        let span = info_span!("export", rows = rows.len());
        let _guard = span.enter();

        let mut counters = self.counters();
        let mut orders = Vec::new();
        let mut skipped_rows = Vec::new();
        for row in rows {
            if self
                .options
                .max_orders
                .is_some_and(|max| orders.len() >= max)
            {
                debug!(max_orders = orders.len(), "order limit reached");
                break;
            }
            match self.process_row(row, &mut counters) {
                Some(order) => {
                    debug!(
                        source_index = row.index,
                        order_number = order.order_number,
                        carrier = %order.carrier_id,
                        records = order.records.len(),
                        "order assigned"
                    );
                    orders.push(order);
                }
                None => {
                    debug!(source_index = row.index, "row has no article code, skipped");
                    skipped_rows.push(row.index);
                }
            }
        }

        let run = ExportRun {
            orders,
            skipped_rows,
            counters,
        };
        info!(
            orders = run.orders.len(),
            records = run.record_count(),
            skipped = run.skipped_rows.len(),
            "export transform complete"
        );
        run
    }
}
