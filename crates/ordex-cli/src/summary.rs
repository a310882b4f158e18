use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;

use ordex_cli::workflow::{DeliveryStatus, ExportOutcome, FileSummary, InvoiceOutcome};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_export_summary(outcome: &ExportOutcome) {
    println!("Source: {}", outcome.source.display());
    println!("Destination: {}", outcome.destination.display());
    if !outcome.missing_columns.is_empty() {
        println!("Missing columns: {}", outcome.missing_columns.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Order"),
        header_cell("Carrier"),
        header_cell("Lines"),
        header_cell("States"),
        header_cell("Bytes"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_lines = 0usize;
    for file in &outcome.files {
        let Some(order) = &file.order else {
            continue;
        };
        total_lines += order.records;
        table.add_row(vec![
            Cell::new(&file.name),
            Cell::new(order.order_number),
            Cell::new(&order.carrier).fg(Color::Blue),
            Cell::new(order.records),
            Cell::new(order.states.join(", ")),
            dim_cell(file.bytes),
        ]);
    }
    table.add_row(vec![
        Cell::new(format!("TOTAL ({} files)", outcome.files.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_lines).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    if !outcome.skipped_rows.is_empty() {
        let rows: Vec<String> = outcome
            .skipped_rows
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Skipped rows without article code: {}", rows.join(", "));
    }
    print_delivery(&outcome.delivery, outcome.dry_run);
}

pub fn print_invoice_summary(outcome: &InvoiceOutcome) {
    println!("Destination: {}", outcome.destination.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Bytes")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for FileSummary { name, bytes, .. } in &outcome.files {
        table.add_row(vec![Cell::new(name), dim_cell(bytes)]);
    }
    println!("{table}");
    print_delivery(&outcome.delivery, outcome.dry_run);
}

fn print_delivery(status: &DeliveryStatus, dry_run: bool) {
    match status {
        DeliveryStatus::Delivered { message } if dry_run => {
            println!("Dry run, nothing delivered ({message}).");
        }
        DeliveryStatus::Delivered { message } => println!("{message}"),
        DeliveryStatus::Failed { message, saved_to } => {
            eprintln!("{message}");
            if let Some(dir) = saved_to {
                eprintln!("Files saved to {}", dir.display());
            }
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
