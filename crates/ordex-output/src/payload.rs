//! Order export payloads and filenames.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::debug;

use ordex_model::{AssignedRecord, EXPORT_HEADER, ExportOrder, OutputFile};

use crate::encoding::{LATIN1_PLACEHOLDER, Unmappable, encode_latin1};
use crate::error::EmitError;

/// Field delimiter of export files.
pub const EXPORT_DELIMITER: u8 = b';';

/// Timestamp layout embedded in export filenames.
pub const FILENAME_TIMESTAMP: &str = "%Y%m%d%H%M%S";

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// `OU_EXP_{reference}_{timestamp}.csv`.
pub fn export_filename(reference: &str, generated_at: NaiveDateTime) -> String {
    format!(
        "OU_EXP_{}_{}.csv",
        reference,
        generated_at.format(FILENAME_TIMESTAMP)
    )
}

/// Filename component identifying an order: its first transaction
/// reference, or the source row index when the order has none.
pub fn order_reference(order: &ExportOrder) -> String {
    match order.first_reference() {
        Some(reference) => sanitize_component(reference),
        None => order.source_index.to_string(),
    }
}

/// Renders records as the `;`-separated, Latin-1 export table.
pub fn render_payload(records: &[AssignedRecord]) -> Result<Vec<u8>, EmitError> {
    let mut writer = WriterBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for record in records {
        writer.write_record(record.cells())?;
    }
    let utf8 = writer.into_inner().map_err(|err| err.into_error())?;
    let text = String::from_utf8(utf8)?;
    Ok(encode_latin1(&text, Unmappable::Replace(LATIN1_PLACEHOLDER)))
}

/// Builds the export file of one order; `None` when it has no record.
pub fn order_file(
    order: &ExportOrder,
    generated_at: NaiveDateTime,
) -> Result<Option<OutputFile>, EmitError> {
    if order.records.is_empty() {
        return Ok(None);
    }
    let name = export_filename(&order_reference(order), generated_at);
    let bytes = render_payload(&order.records)?;
    Ok(Some(OutputFile::new(name, bytes)))
}

/// Builds the export files of a run, all stamped with `generated_at`.
///
/// Orders sharing a reference get `-2`, `-3`, ... appended to it so that no
/// file of the batch replaces another on the drop. A suffixed name that is
/// already taken, for instance by an order whose own reference is `T1-2`,
/// moves on to the next free suffix.
pub fn emit_batch(
    orders: &[ExportOrder],
    generated_at: NaiveDateTime,
) -> Result<Vec<OutputFile>, EmitError> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut files = Vec::with_capacity(orders.len());
    for order in orders {
        if order.records.is_empty() {
            continue;
        }
        let base = order_reference(order);
        let mut reference = base.clone();
        let mut suffix = 1usize;
        while taken.contains(&reference) {
            suffix += 1;
            reference = format!("{base}-{suffix}");
        }
        taken.insert(reference.clone());
        let name = export_filename(&reference, generated_at);
        let bytes = render_payload(&order.records)?;
        debug!(
            file = %name,
            order_number = order.order_number,
            bytes = bytes.len(),
            "export file rendered"
        );
        files.push(OutputFile::new(name, bytes));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ordex_model::OrderState;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|date| date.and_hms_opt(9, 5, 1))
            .unwrap()
    }

    fn order(source_index: usize, reference: &str) -> ExportOrder {
        ExportOrder {
            source_index,
            order_number: 1,
            carrier_id: "GLS".to_string(),
            records: vec![AssignedRecord {
                transaction_ref: reference.to_string(),
                line_number: 1,
                order_number: 1,
                state: OrderState::Delete,
                tracking_number: String::new(),
                carrier_id: "GLS".to_string(),
                article_code: "C1".to_string(),
                label: String::new(),
                quantity: "1".to_string(),
                unit_sale_price: String::new(),
                purchase_price: String::new(),
            }],
        }
    }

    #[test]
    fn sanitize_component_keeps_safe_characters() {
        assert_eq!(sanitize_component("CMD-12.3_a"), "CMD-12.3_a");
        assert_eq!(sanitize_component(" 12/34 é#"), "12_34___");
    }

    #[test]
    fn filename_uses_reference_or_row_index() {
        assert_eq!(
            export_filename(&order_reference(&order(3, "T 1")), stamp()),
            "OU_EXP_T_1_20250307090501.csv"
        );
        assert_eq!(
            export_filename(&order_reference(&order(3, "  ")), stamp()),
            "OU_EXP_3_20250307090501.csv"
        );
    }

    #[test]
    fn batch_disambiguates_repeated_references() {
        let mut empty = order(2, "T9");
        empty.records.clear();
        let orders = [order(0, "T1"), order(1, "T1"), empty, order(3, "T1")];
        let files = emit_batch(&orders, stamp()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "OU_EXP_T1_20250307090501.csv",
                "OU_EXP_T1-2_20250307090501.csv",
                "OU_EXP_T1-3_20250307090501.csv",
            ]
        );
    }

    #[test]
    fn suffixes_skip_references_already_in_the_batch() {
        let orders = [order(0, "T1"), order(1, "T1"), order(2, "T1-2")];
        let files = emit_batch(&orders, stamp()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "OU_EXP_T1_20250307090501.csv",
                "OU_EXP_T1-2_20250307090501.csv",
                "OU_EXP_T1-2-2_20250307090501.csv",
            ]
        );
        let distinct: BTreeSet<&str> = names.iter().copied().collect();
        assert_eq!(distinct.len(), files.len());
    }

    #[test]
    fn order_without_records_has_no_file() {
        let mut empty = order(0, "T1");
        empty.records.clear();
        assert!(order_file(&empty, stamp()).unwrap().is_none());
    }
}
