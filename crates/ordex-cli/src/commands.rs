use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use comfy_table::{Cell, Table};
use tracing::info;

use ordex_cli::config::{ConfigFile, EnvLayer, merged_catalog, resolve, resolve_delivery};
use ordex_cli::workflow::{ExportOutcome, InvoiceOutcome, run_export, run_invoice};
use ordex_model::OrderState;
use ordex_output::InvoiceRequest;

use crate::cli::{CatalogArgs, ExportArgs, InvoiceArgs};
use crate::summary::{apply_table_style, header_cell};

fn load_config(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            ConfigFile::load(path)
        }
        None => Ok(ConfigFile::default()),
    }
}

pub fn run_export_command(args: &ExportArgs) -> Result<ExportOutcome> {
    let file = load_config(args.delivery.config.as_deref())?;
    let config = resolve(&file, &EnvLayer::from_process(), &args.flag_layer())
        .context("invalid export configuration")?;
    let generated_at = Local::now().naive_local();
    run_export(&config, &args.source, args.delivery.dry_run, generated_at)
}

pub fn run_invoice_command(args: &InvoiceArgs) -> Result<InvoiceOutcome> {
    let file = load_config(args.delivery.config.as_deref())?;
    let delivery = resolve_delivery(
        &file,
        &EnvLayer::from_process(),
        &args.delivery.flag_layer(),
    );
    let document =
        fs::read(&args.pdf).with_context(|| format!("read invoice {}", args.pdf.display()))?;
    let request = InvoiceRequest {
        order_number: args.order.clone(),
        invoice_number: args.invoice.clone(),
        document,
        date: args.date.unwrap_or_else(|| Local::now().date_naive()),
    };
    run_invoice(&delivery, &request, args.delivery.dry_run)
}

pub fn run_states() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("State"),
        header_cell("Flag value"),
        header_cell("Tracked"),
    ]);
    apply_table_style(&mut table);
    for state in OrderState::ALL {
        let label = state.as_str();
        table.add_row(vec![
            Cell::new(label),
            Cell::new(label.to_lowercase().replace(' ', "-")),
            Cell::new(if state.is_in_delivery() { "yes" } else { "-" }),
        ]);
    }
    println!("{table}");
}

pub fn run_carriers(args: &CatalogArgs) -> Result<()> {
    let file = load_config(args.config.as_deref())?;
    let catalog = merged_catalog(&file);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Name"),
        header_cell("Tracking code"),
    ]);
    apply_table_style(&mut table);
    for carrier in catalog.carriers() {
        table.add_row(vec![&carrier.id, &carrier.name, &carrier.tracking_code]);
    }
    println!("{table}");
    Ok(())
}
