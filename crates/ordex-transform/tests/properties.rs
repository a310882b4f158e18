//! Property tests for the normalizer and assigner.

use proptest::prelude::*;

use ordex_model::{
    Carrier, ExportOptions, OrderState, PartialSplit, SourceColumn, SourceRow, StateMode,
};
use ordex_transform::{ExportPipeline, explode_row};

fn composite(values: &[String]) -> String {
    values.join("|")
}

proptest! {
    #[test]
    fn exploded_lines_match_non_empty_article_codes(
        codes in prop::collection::vec(prop_oneof!["C[0-9]{1,5}", Just(String::new())], 0..8),
        refs in prop::collection::vec("[A-Z0-9]{1,6}", 0..10),
        quantities in prop::collection::vec("[0-9]{1,3}", 0..10),
    ) {
        let row = SourceRow::new(0)
            .with(SourceColumn::ArticleCode, composite(&codes))
            .with(SourceColumn::Reference, composite(&refs))
            .with(SourceColumn::Quantity, composite(&quantities));

        let expected = codes.iter().filter(|code| !code.is_empty()).count();
        prop_assert_eq!(explode_row(&row).len(), expected);
    }

    #[test]
    fn tracking_is_set_only_for_delivery(
        state_picks in prop::collection::vec(0usize..7, 1..7),
        line_counts in prop::collection::vec(1usize..5, 1..6),
        seed in any::<u64>(),
    ) {
        let states: Vec<OrderState> = state_picks.iter().map(|&i| OrderState::ALL[i]).collect();
        let options = ExportOptions::new(states, vec![Carrier::new("GLS", "GLS", "TRACK")])
            .with_mode(StateMode::Random)
            .with_seed(Some(seed));
        let rows: Vec<SourceRow> = line_counts
            .iter()
            .enumerate()
            .map(|(idx, &count)| {
                let codes: Vec<String> = (0..count).map(|i| format!("C{i}")).collect();
                SourceRow::new(idx).with(SourceColumn::ArticleCode, composite(&codes))
            })
            .collect();

        let run = ExportPipeline::new(options).unwrap().run(&rows);

        for record in run.orders.iter().flat_map(|order| order.records.iter()) {
            if record.state.is_in_delivery() {
                prop_assert_eq!(record.tracking_number.as_str(), "TRACK");
            } else {
                prop_assert!(record.tracking_number.is_empty());
            }
        }
    }

    #[test]
    fn partial_split_never_yields_non_positive_quantities(
        quantity in 0i64..50,
        split in 1u32..20,
    ) {
        let split_policy = PartialSplit { quantity: split, state_a: None, state_b: None };
        let options = ExportOptions::new(
            vec![OrderState::EnTraitement],
            vec![Carrier::new("GLS", "GLS", "T")],
        )
        .with_partial_split(Some(split_policy));
        let row = SourceRow::new(0)
            .with(SourceColumn::ArticleCode, "C1")
            .with(SourceColumn::Quantity, quantity.to_string());

        let run = ExportPipeline::new(options).unwrap().run(&[row]);
        let records = &run.orders[0].records;

        if quantity > i64::from(split) {
            prop_assert_eq!(records.len(), 2);
            let parsed: Vec<i64> = records.iter().map(|r| r.quantity.parse().unwrap()).collect();
            prop_assert!(parsed.iter().all(|&q| q > 0));
            prop_assert_eq!(parsed[0] + parsed[1], quantity);
            prop_assert_eq!(records[1].line_number, records[0].line_number + 1);
        } else {
            prop_assert_eq!(records.len(), 1);
            prop_assert_eq!(records[0].quantity.clone(), quantity.to_string());
        }
    }
}
