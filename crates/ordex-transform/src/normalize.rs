//! Row normalizer: explodes composite cells into aligned order lines.
//!
//! Each composite cell holds one sub-value per order line, joined with `|`.
//! Sub-lists of the same row are not guaranteed to have the same length;
//! a shorter list reads as empty at the missing positions. A candidate line
//! survives only if its article code is non-empty.
//!
//! Nothing here fails on malformed data: unparseable numbers become `0`
//! (prices) or fall back to the raw text (quantities).

use std::collections::BTreeMap;

use ordex_model::{ExplodedLine, SourceColumn, SourceRow};

/// Separator between sub-values of a composite cell.
pub const COMPOSITE_SEPARATOR: char = '|';

/// Splits a composite cell into trimmed sub-values.
///
/// Empty cells and the `nan` marker written by spreadsheet exports for
/// missing values yield no sub-values at all.
pub fn split_composite(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Vec::new();
    }
    trimmed
        .split(COMPOSITE_SEPARATOR)
        .map(|part| part.trim().to_string())
        .collect()
}

/// Explodes one source row into its order lines.
pub fn explode_row(row: &SourceRow) -> Vec<ExplodedLine> {
    let parts: BTreeMap<SourceColumn, Vec<String>> = SourceColumn::ALL
        .into_iter()
        .map(|column| (column, split_composite(row.value(column))))
        .collect();
    let width = parts.values().map(Vec::len).max().unwrap_or(0);
    let at = |column: SourceColumn, idx: usize| {
        parts
            .get(&column)
            .and_then(|values| values.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    };

    (0..width)
        .filter_map(|idx| {
            let article_code = at(SourceColumn::ArticleCode, idx);
            if article_code.is_empty() {
                return None;
            }
            Some(ExplodedLine {
                source_index: row.index,
                sub_index: idx,
                transaction_ref: at(SourceColumn::Reference, idx).to_string(),
                article_code: article_code.to_string(),
                label: at(SourceColumn::Label, idx).to_string(),
                quantity: at(SourceColumn::Quantity, idx).to_string(),
                unit_sale_price: format_price(at(SourceColumn::UnitSalePrice, idx)),
                purchase_price: format_price(at(SourceColumn::PurchasePrice, idx)),
            })
        })
        .collect()
}

fn clean_number(raw: &str) -> String {
    raw.chars()
        .filter(|ch| !matches!(ch, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect()
}

/// Locale-tolerant float parse; anything unparseable is `0.0`.
pub fn parse_price(raw: &str) -> f64 {
    clean_number(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Formats a price stored in cents as `units,cents`.
///
/// Rounds half away from zero on the cent. Empty input stays empty;
/// unparseable input renders as `0,00`.
pub fn format_price(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    let cents = parse_price(raw).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!("{sign}{},{:02}", magnitude / 100, magnitude % 100)
}

/// Parses a quantity, accepting comma decimals and truncating toward zero.
pub fn parse_quantity(raw: &str) -> Option<i64> {
    clean_number(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .map(|value| value.trunc() as i64)
}

/// Quantity used for partial-split arithmetic; unparseable values count as 1.
pub fn quantity_for_split(raw: &str) -> i64 {
    parse_quantity(raw).unwrap_or(1)
}
