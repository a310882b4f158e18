//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ordex_cli::config::FlagLayer;
use ordex_model::{OrderNumbering, StateMode};

#[derive(Parser)]
#[command(
    name = "ordex",
    version,
    about = "Order-state export - turn an order spreadsheet into importer drop files",
    long_about = "Turn a denormalized order spreadsheet into one semicolon-separated,\n\
                  Latin-1 export file per order and drop them where the order system\n\
                  picks them up. Also sends invoice PDFs with their control record."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include order references and labels in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Export one file per order of a source table.
    Export(ExportArgs),

    /// Send an invoice PDF and its control record.
    Invoice(InvoiceArgs),

    /// List the order states.
    States,

    /// List the carrier catalog.
    Carriers(CatalogArgs),
}

/// Options shared by commands that deliver files.
#[derive(Args)]
pub struct DeliveryArgs {
    /// TOML configuration file.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory the drop directory lives in (env: ORDEX_DROP_ROOT).
    #[arg(long = "drop-root", value_name = "DIR")]
    pub drop_root: Option<PathBuf>,

    /// Drop directory name under the root (env: ORDEX_DROP_DIR, default: refonteTest).
    #[arg(long = "drop-dir", value_name = "NAME")]
    pub drop_dir: Option<String>,

    /// Generate files without delivering them.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Where to save the files when delivery fails.
    #[arg(long = "fallback-dir", value_name = "DIR")]
    pub fallback_dir: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Source order table (CSV).
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    #[command(flatten)]
    pub delivery: DeliveryArgs,

    /// Order state to assign (repeatable).
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<String>,

    /// Carrier id to use (repeatable).
    #[arg(long = "carrier", value_name = "ID")]
    pub carriers: Vec<String>,

    /// How states are picked.
    #[arg(long = "mode", value_enum)]
    pub mode: Option<StateModeArg>,

    /// Draw a random state for every line instead of once per order.
    #[arg(long = "random-per-line")]
    pub random_per_line: bool,

    /// Pick a random carrier per order instead of rotating.
    #[arg(long = "mixed-carriers")]
    pub mixed_carriers: bool,

    /// When the order number advances.
    #[arg(long = "order-numbering", value_enum)]
    pub order_numbering: Option<OrderNumberingArg>,

    /// First order number of the run.
    #[arg(long = "order-base", value_name = "N")]
    pub order_base: Option<u64>,

    /// Stop after N generated orders (0 = all).
    #[arg(long = "max-orders", value_name = "N")]
    pub max_orders: Option<usize>,

    /// Split lines with more than N units into N units plus the remainder.
    #[arg(long = "split-quantity", value_name = "N")]
    pub split_quantity: Option<u32>,

    /// State of the first split record.
    #[arg(long = "split-state-a", value_name = "STATE", requires = "split_quantity")]
    pub split_state_a: Option<String>,

    /// State of the remainder record.
    #[arg(long = "split-state-b", value_name = "STATE", requires = "split_quantity")]
    pub split_state_b: Option<String>,

    /// Seed for random state and carrier picks.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    /// Field separator of the source table (default: ',').
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,
}

impl ExportArgs {
    pub fn flag_layer(&self) -> FlagLayer {
        FlagLayer {
            states: self.states.clone(),
            carriers: self.carriers.clone(),
            mode: self.mode.map(StateMode::from),
            random_per_line: self.random_per_line,
            mixed_carriers: self.mixed_carriers,
            order_numbering: self.order_numbering.map(OrderNumbering::from),
            order_base: self.order_base,
            max_orders: self.max_orders,
            split_quantity: self.split_quantity,
            split_state_a: self.split_state_a.clone(),
            split_state_b: self.split_state_b.clone(),
            seed: self.seed,
            delimiter: self.delimiter,
            ..self.delivery.flag_layer()
        }
    }
}

impl DeliveryArgs {
    pub fn flag_layer(&self) -> FlagLayer {
        FlagLayer {
            drop_root: self.drop_root.clone(),
            drop_dir: self.drop_dir.clone(),
            fallback_dir: self.fallback_dir.clone(),
            ..FlagLayer::default()
        }
    }
}

#[derive(Parser)]
pub struct InvoiceArgs {
    /// Order number the invoice belongs to.
    #[arg(long = "order", value_name = "ORDER")]
    pub order: String,

    /// Invoice number.
    #[arg(long = "invoice", value_name = "INVOICE")]
    pub invoice: String,

    /// Invoice PDF.
    #[arg(long = "pdf", value_name = "FILE")]
    pub pdf: PathBuf,

    /// Invoice date, YYYY-MM-DD (default: today).
    #[arg(long = "date", value_name = "DATE")]
    pub date: Option<NaiveDate>,

    #[command(flatten)]
    pub delivery: DeliveryArgs,
}

#[derive(Parser)]
pub struct CatalogArgs {
    /// TOML configuration file with extra carriers.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StateModeArg {
    Unique,
    Cyclic,
    Random,
}

impl From<StateModeArg> for StateMode {
    fn from(value: StateModeArg) -> Self {
        match value {
            StateModeArg::Unique => StateMode::Unique,
            StateModeArg::Cyclic => StateMode::Cyclic,
            StateModeArg::Random => StateMode::Random,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OrderNumberingArg {
    EveryOrder,
    DeliveryOnly,
}

impl From<OrderNumberingArg> for OrderNumbering {
    fn from(value: OrderNumberingArg) -> Self {
        match value {
            OrderNumberingArg::EveryOrder => OrderNumbering::EveryOrder,
            OrderNumberingArg::DeliveryOnly => OrderNumbering::DeliveryOnly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
